//! The `quickread init` command.

use anyhow::Result;

use quickread_content::config::starter_config;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("quickread.toml");
    if path.exists() {
        println!("quickread.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write(path, starter_config()?)?;
    println!("Created quickread.toml");

    println!("\nNext steps:");
    println!("  1. Adjust the speeds in quickread.toml");
    println!("  2. Run: quickread read --topic fotossíntese");

    Ok(())
}
