//! Command-line arguments.

use crate::config::MessageSource;
use crate::error::{GameError, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Skyflap - terminal side-scroller

Usage: skyflap [options]

Options:
  --config <path>        Load settings from a JSON file
  --messages <path|url>  Load flavor text from a file or URL
  --seed <n>             Seed the random generator (repeatable runs)
  --version, -v          Show version information
  --help, -h             Show this help message

Controls: Space/Up jump, click or Enter to continue, Esc quits.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(PlayOptions),
    Version,
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOptions {
    pub config: Option<PathBuf>,
    pub messages: Option<MessageSource>,
    pub seed: Option<u64>,
}

/// Parse arguments, excluding the program name.
pub fn parse<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = PlayOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        let mut value = |flag: &str| {
            args.next()
                .map(|v| v.as_ref().to_string())
                .ok_or_else(|| GameError::Usage(format!("{} needs a value", flag)))
        };
        match arg {
            "--version" | "-v" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--config" => options.config = Some(PathBuf::from(value(arg)?)),
            "--messages" => options.messages = Some(MessageSource::parse(&value(arg)?)),
            "--seed" => {
                let raw = value(arg)?;
                let seed = raw
                    .parse()
                    .map_err(|_| GameError::Usage(format!("invalid seed: {}", raw)))?;
                options.seed = Some(seed);
            }
            other => {
                return Err(GameError::Usage(format!(
                    "unknown argument: {}\nRun 'skyflap --help' for usage.",
                    other
                )))
            }
        }
    }

    Ok(Command::Play(options))
}
