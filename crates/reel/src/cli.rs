use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands::simulate::{HoverSpan, ScheduledStep};

#[derive(Parser)]
#[command(name = "reel")]
#[command(author, version, about)]
#[command(long_about = "A looping, pausable testimonial carousel.\n\n\
    Plays a deck of testimonials as a continuously scrolling strip. Hover to\n\
    pause and reveal the prev/next controls.\n\n\
    Examples:\n  \
    reel                          Play the built-in sample deck\n  \
    reel families.yaml --windowed Play a deck file in a window\n  \
    reel simulate --ticks 600     Trace the controller without a display")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Testimonial deck (YAML). Uses the built-in sample deck when omitted.
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Color theme (overrides config)
    #[arg(long, value_enum, global = false)]
    pub theme: Option<ThemeName>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the carousel controller against a simulated frame clock
    Simulate {
        /// Testimonial deck (YAML). Uses the built-in sample deck when omitted.
        file: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(long, default_value = "600")]
        ticks: u64,

        /// Print a sample every N ticks
        #[arg(long, default_value = "60")]
        every: u64,

        /// Manual step at a tick, e.g. `forward@120` (repeatable)
        #[arg(long = "step", value_name = "DIRECTION@TICK")]
        steps: Vec<ScheduledStep>,

        /// Hover (pause) between two ticks, e.g. `100-300`
        #[arg(long, value_name = "START-END")]
        hover: Option<HoverSpan>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.velocity, defaults.easing, defaults.theme)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Simulate {
                file,
                ticks,
                every,
                steps,
                hover,
            }) => crate::commands::simulate::run(file, ticks, every, steps, hover),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("reel {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(self.file, self.windowed, self.theme.map(ThemeName::as_str))
            }
        }
    }
}
