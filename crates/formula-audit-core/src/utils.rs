//! Utility functions for rule implementations and the analyzer.

pub mod allowance;
pub mod patterns;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use patterns::{name_matches, path_matches};
