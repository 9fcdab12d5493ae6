//! Command-line front end for the theme preference.
//!
//! Reads and changes the same stored preference a desktop or web front end
//! would, using the OS setting as the fallback:
//!
//! ```text
//! themekeeper status
//! themekeeper toggle
//! themekeeper set dark
//! themekeeper watch
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use themekeeper::{
    ChangeSource, ColorMode, FileStore, MemoryDocument, MemoryStore, OsAppearance,
    PreferenceStore, ThemeConfig, ThemeManager,
};

type CliManager = ThemeManager<Box<dyn PreferenceStore>, OsAppearance, MemoryDocument>;

#[derive(Parser, Debug)]
#[command(name = "themekeeper", version, about = "Inspect and change the light/dark theme preference")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference file (defaults to the user config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Do not read or write the preference file
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the stored choice, the OS setting and the effective theme
    Status,
    /// Flip between light and dark
    Toggle,
    /// Choose a theme explicitly
    Set {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Print the effective theme whenever the OS setting changes it
    Watch,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Light,
    Dark,
}

impl From<ModeArg> for ColorMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Light => ColorMode::Light,
            ModeArg::Dark => ColorMode::Dark,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ThemeConfig::load(path)?,
        None => ThemeConfig::default(),
    };
    let store = open_store(&cli)?;
    let appearance = appearance_for(&cli.command, &config);
    let mut manager: CliManager = ThemeManager::new(config, store, appearance, MemoryDocument::new());

    manager.initialize();

    match cli.command {
        Command::Status => print_status(&manager),
        Command::Toggle => {
            let toggled = manager.toggle_theme();
            report_choice(toggled.theme, toggled.persisted, &manager);
        }
        Command::Set { mode } => {
            let toggled = manager.select_theme(mode.into());
            report_choice(toggled.theme, toggled.persisted, &manager);
        }
        Command::Watch => watch(&mut manager),
    }
    Ok(())
}

/// Only `watch` drains OS changes, so the other commands never start the
/// polling thread.
fn appearance_for(command: &Command, config: &ThemeConfig) -> OsAppearance {
    let interval = match command {
        Command::Watch => config.system_poll_interval(),
        Command::Status | Command::Toggle | Command::Set { .. } => Duration::ZERO,
    };
    OsAppearance::new().with_poll_interval(interval)
}

fn open_store(cli: &Cli) -> Result<Box<dyn PreferenceStore>> {
    if cli.no_persist {
        return Ok(Box::new(MemoryStore::disabled()));
    }
    let path = match &cli.store {
        Some(path) => path.clone(),
        None => dirs::config_dir()
            .context("no user config directory; pass --store")?
            .join("themekeeper")
            .join("preferences.json"),
    };
    Ok(Box::new(FileStore::new(path)))
}

fn styled_mode(mode: ColorMode) -> console::StyledObject<&'static str> {
    match mode {
        ColorMode::Dark => style(mode.as_str()).magenta().bold(),
        ColorMode::Light => style(mode.as_str()).yellow().bold(),
    }
}

fn print_status(manager: &CliManager) {
    let stored = manager
        .stored_preference()
        .map_or_else(|| "none".to_string(), |theme| theme.to_string());
    let effective = manager.current_effective_theme();

    println!("effective: {}", styled_mode(effective));
    println!("stored:    {}", style(stored).dim());
    println!("os:        {}", style(manager.resolve_system_theme()).dim());
    println!("next:      {}", manager.config().label_for(effective));
}

fn report_choice(mode: ColorMode, persisted: bool, manager: &CliManager) {
    println!("theme set to {}", styled_mode(mode));
    if !persisted {
        eprintln!(
            "{} preference not saved, it only applies to this run",
            style("warning:").yellow().bold()
        );
    }
    println!("{}", style(manager.config().label_for(mode)).dim());
}

fn watch(manager: &mut CliManager) {
    if !manager.is_watching_system() {
        eprintln!("OS theme changes cannot be observed here");
        return;
    }
    manager.subscribe(|change| {
        if change.source == ChangeSource::SystemPreference {
            println!("{}", styled_mode(change.theme));
        }
    });

    println!("watching, currently {}", styled_mode(manager.current_effective_theme()));
    if manager.stored_preference().is_some_and(|theme| !theme.is_system()) {
        println!(
            "{}",
            style("an explicit choice is stored; OS changes will not apply").dim()
        );
    }

    loop {
        manager.process_system_changes();
        if !manager.is_watching_system() {
            break;
        }
        thread::sleep(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_watch_polls_the_os() {
        let config = ThemeConfig::default();

        for command in [
            Command::Status,
            Command::Toggle,
            Command::Set { mode: ModeArg::Dark },
        ] {
            assert_eq!(appearance_for(&command, &config).poll_interval(), Duration::ZERO);
        }
        assert_eq!(
            appearance_for(&Command::Watch, &config).poll_interval(),
            config.system_poll_interval()
        );
    }

    #[test]
    fn test_one_shot_commands_do_not_watch() {
        let store: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
        let mut manager: CliManager = ThemeManager::new(
            ThemeConfig::default(),
            store,
            appearance_for(&Command::Toggle, &ThemeConfig::default())
                .with_detector(|| ColorMode::Dark),
            MemoryDocument::new(),
        );
        manager.initialize();

        assert!(!manager.is_watching_system());
        assert!(!manager.appearance().is_polling());
    }

    #[test]
    fn test_cli_parses_set() {
        let cli = Cli::try_parse_from(["themekeeper", "--no-persist", "set", "light"]).unwrap();
        assert!(cli.no_persist);
        assert!(matches!(cli.command, Command::Set { mode: ModeArg::Light }));
    }
}
