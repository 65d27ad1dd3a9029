use anyhow::Context;
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use self::{
    features::FeaturesArg, replay::ReplayArg, summarize::SummarizeArg, window::WindowArg,
};

mod features;
mod replay;
mod summarize;
mod window;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log level for messages written to stderr
    #[arg(long, global = true, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    /// Shorthand for `--log-level debug`
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Replay a transcript and dump the game states as JSON
    Replay(#[clap(flatten)] ReplayArg),
    /// Parse every transcript in a corpus directory and summarize it
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Compute utterance features from annotation files
    Features(#[clap(flatten)] FeaturesArg),
    /// Score the card windows around a card for two hands
    Window(#[clap(flatten)] WindowArg),
}

impl CommandArgs {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            self.log_level.max(LevelFilter::Debug)
        } else {
            self.log_level
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    TermLogger::init(
        args.log_level(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;

    match &args.mode {
        Mode::Replay(arg) => replay::run(arg)?,
        Mode::Summarize(arg) => summarize::run(arg)?,
        Mode::Features(arg) => features::run(arg)?,
        Mode::Window(arg) => window::run(arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flags() {
        let args = CommandArgs::try_parse_from(["wildcard", "window", "5H"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Warn);

        let args = CommandArgs::try_parse_from(["wildcard", "window", "5H", "-v"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Debug);

        let args =
            CommandArgs::try_parse_from(["wildcard", "--log-level", "trace", "-v", "window", "5H"])
                .unwrap();
        assert_eq!(args.log_level(), LevelFilter::Trace);

        let args = CommandArgs::try_parse_from(["wildcard", "--log-level", "off", "window", "5H"])
            .unwrap();
        assert_eq!(args.log_level(), LevelFilter::Off);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(CommandArgs::try_parse_from(["wildcard"]).is_err());
    }
}
