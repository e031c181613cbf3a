//! List rules command implementation.

use formula_audit::rules::{all_rules, minimal_rules};
use formula_audit::Rule;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<30} {:<21} {:<4} Description",
        "Code", "Name", "Family", "Fix"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!("{}", describe(rule.as_ref()));
    }

    let minimal: Vec<&str> = minimal_rules().iter().map(|r| r.code()).collect();

    println!("\nPresets:");
    println!("  recommended  - All rules at their default severity (default)");
    println!("  strict       - All rules, conventions reported as warnings");
    println!("  minimal      - {}", minimal.join(", "));

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  formula-audit check --rules deprecated-dependency,zero-rebuild");
    println!("  formula-audit check --rules FA001,FA015");
}

fn describe(rule: &dyn Rule) -> String {
    format!(
        "{:<7} {:<30} {:<21} {:<4} {}",
        rule.code(),
        rule.name(),
        rule.family(),
        if rule.correctable() { "yes" } else { "" },
        rule.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_audit::rules::DeprecatedDependency;

    #[test]
    fn describe_marks_correctable_rules() {
        let line = describe(&DeprecatedDependency::new());
        assert!(line.starts_with("FA001   deprecated-dependency"));
        assert!(line.contains(" yes "));
    }
}
