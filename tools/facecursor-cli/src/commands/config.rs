//! Show or initialize the config file.

use anyhow::Context;
use facecursor_common::AppConfig;

pub fn run(config: AppConfig, init: bool) -> anyhow::Result<()> {
    let path = AppConfig::path();

    if init {
        if path.exists() {
            println!("Config already exists at: {}", path.display());
            return Ok(());
        }
        AppConfig::default()
            .save()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default config to: {}", path.display());
        return Ok(());
    }

    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
