#[cfg(feature = "browser")]
mod capture;
mod decrypt;
#[cfg(feature = "browser")]
mod save;

#[cfg(feature = "browser")]
pub use capture::Capture;
pub use decrypt::Decrypt;
#[cfg(feature = "browser")]
pub use save::Save;

use anyhow::Result;
use clap::{ArgAction, ColorChoice, Parser, Subcommand};

/// Capture access tokens, download and decrypt subtitles of drama episodes.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// When to output colored text.
    #[arg(long, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Increase logging verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[cfg(feature = "browser")]
    Capture(Capture),
    Decrypt(Decrypt),
    #[cfg(feature = "browser")]
    Save(Save),
}

impl Commands {
    pub async fn execute(self) -> Result<()> {
        match self {
            #[cfg(feature = "browser")]
            Self::Capture(args) => args.execute().await,
            Self::Decrypt(args) => args.execute(),
            #[cfg(feature = "browser")]
            Self::Save(args) => args.execute().await,
        }
    }
}
