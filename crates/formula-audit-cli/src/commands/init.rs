//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# formula-audit configuration

# Rule set: "recommended", "strict" or "minimal"
preset = "recommended"

# Lowest severity that fails `formula-audit check`
fail_on = "convention"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./Formula"

# Patterns to exclude from analysis
exclude = [
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.deprecated-dependency]
enabled = true
# severity = "warning"  # Override default severity

# [rules.os-linux-check]
# enabled = false

# Extra exemptions, added to the built-in ones
# [[exemptions]]
# rules = ["universal-binary"]
# class_name = "Wine*"
# reason = "builds 32-bit components"

# Additions to the rule data tables
# [tables]
# dependency_options = ["with-python"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("formula-audit.toml"), force)?;

    println!("Created formula-audit.toml");
    println!("\nNext steps:");
    println!("  1. Edit formula-audit.toml to configure rules");
    println!("  2. Run: formula-audit check Formula");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_audit::Config;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(
            config.fail_on_severity().unwrap(),
            formula_audit::Severity::Convention
        );
        assert!(config.is_rule_enabled("deprecated-dependency"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formula-audit.toml");
        std::fs::write(&path, "preset = \"minimal\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        write_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("preset = \"recommended\""));
    }
}
