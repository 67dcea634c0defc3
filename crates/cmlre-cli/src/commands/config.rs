//! Configuration management commands.

use anyhow::Result;
use cmlre::CmlreConfig;

use crate::style::print_header;

/// Show the effective configuration.
pub fn show(config: &CmlreConfig, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "toml" => {
            println!("{}", config.to_toml()?);
        }
        _ => {
            print_header("CMLRE Configuration");
            println!("====================\n");

            println!("Access:");
            println!("  Strict: {}", config.access.strict);
            println!("  Log evaluations: {}", config.access.log_evaluations);
            println!();

            println!("Audit:");
            println!("  Sink: {}", config.audit.sink);
            println!("  Path: {}", config.audit.path.display());
            println!();

            println!("Session:");
            println!("  State directory: {}", config.session.state_dir.display());
            println!("  Session key: {}", config.session.session_key);
            println!("  Settings key: {}", config.session.settings_key);
            println!();

            println!("Logging:");
            println!("  Level: {}", config.logging.level);
        }
    }

    Ok(())
}
