use std::io::Write;
use std::path::Path;

use crate::application::config::AppConfig;

/// Prints the effective configuration, or writes the defaults with `init`.
///
/// `init` never overwrites an existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn run_config(
    config: &AppConfig,
    path: &Path,
    init: bool,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    if init {
        if path.exists() {
            eprintln!("Configuration already exists at {}", path.display());
            return Ok(1);
        }
        AppConfig::default().save_to(path)?;
        writeln!(out, "Wrote default configuration to {}", path.display())?;
        return Ok(0);
    }

    writeln!(out, "# {}", path.display())?;
    write!(out, "{}", config.to_toml()?)?;
    Ok(0)
}
