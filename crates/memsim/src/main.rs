use std::{
    io::{self, IsTerminal as _},
    process,
    str::FromStr,
};

use argh::FromArgs;
use block_list::{AllocError, BlockList};
use snafu::ResultExt as _;
use snafu_utils::{GenericError, Report};

use self::{
    log::LogLevel,
    shell::{Shell, ShellOptions},
};

#[macro_use]
mod log;
mod command;
mod shell;

/// Simulate contiguous memory allocation for named processes.
///
/// Commands are read from standard input, one per line:
/// `RQ <name> <size> <F|B|W>`, `RL <name>`, `C`, `STAT` and `X`.
#[derive(Debug, FromArgs)]
struct Args {
    /// total size of the simulated memory in bytes
    #[argh(positional)]
    memory_size: usize,

    /// do not print the prompt before each command
    #[argh(switch, short = 'q')]
    quiet: bool,

    /// print usage totals after each STAT report
    #[argh(switch, short = 's')]
    summary: bool,

    /// when to use colors: auto, always or never
    #[argh(option, default = "ColorMode::Auto")]
    color: ColorMode,

    /// diagnostics written to stderr: trace, debug, info, warn, error or off
    #[argh(option, default = "LogLevel::Warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(format!(
                "invalid color mode `{s}`, expected one of: auto, always, never"
            )),
        }
    }
}

fn main() {
    let args: Args = argh::from_env();
    ansi_term::set_enabled(args.color.enabled());
    log::set_max_level(args.log_level);

    if let Err(err) = run(&args) {
        eprintln!("{}", fatal_report(err));
        process::exit(1);
    }
}

fn fatal_report(err: GenericError) -> Report<GenericError> {
    Report::new(err)
        .with_locator(|error| error.downcast_ref::<AllocError>().map(AllocError::location))
}

fn run(args: &Args) -> Result<(), GenericError> {
    let memory = BlockList::new(args.memory_size).whatever_context("invalid memory size")?;
    info!("simulating {} bytes of contiguous memory", memory.total_size());

    let options = ShellOptions {
        prompt: !args.quiet,
        summary: args.summary,
    };
    let mut shell = Shell::new(memory, io::stdout().lock(), options);
    shell
        .run(io::stdin().lock())
        .whatever_context("failed to run the command loop")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::from_args(&["memsim"], &["100", "-q", "--color", "never"]).unwrap();
        assert_eq!(args.memory_size, 100);
        assert!(args.quiet);
        assert!(!args.summary);
        assert_eq!(args.color, ColorMode::Never);
        assert_eq!(args.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_rejects_bad_args() {
        assert!(Args::from_args(&["memsim"], &[]).is_err());
        assert!(Args::from_args(&["memsim"], &["lots"]).is_err());
        assert!(Args::from_args(&["memsim"], &["-5"]).is_err());
        assert!(Args::from_args(&["memsim"], &["10", "--color", "sometimes"]).is_err());
    }

    #[test]
    fn test_zero_memory_is_fatal() {
        let args = Args::from_args(&["memsim"], &["0"]).unwrap();
        let err = run(&args).unwrap_err();
        assert_eq!(err.message(), "invalid memory size");

        ansi_term::set_enabled(false);
        let report = fatal_report(err).to_string();
        assert!(report.starts_with("Error: invalid memory size\n  at "));
        assert!(report.contains("   0: Memory size must be positive\n      at "));
        assert!(report.contains("list.rs"));
    }
}
