use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "  (not created yet, showing defaults)".dimmed());
    }
    println!();

    let layout = config.layout();
    let theme = config.theme().unwrap_or("light");
    println!("{}", "Effective settings:".bold());
    println!("  defaults.theme            {theme}");
    println!("  defaults.item_width       {}", layout.item_width);
    println!("  defaults.gap              {}", layout.gap);
    println!("  defaults.velocity         {}", layout.velocity);
    println!("  defaults.replication      {}", layout.replication);
    println!(
        "  defaults.step_duration_ms {}",
        layout.step_duration.as_millis()
    );
    println!("  defaults.easing           {}", layout.easing);
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}
