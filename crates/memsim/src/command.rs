use block_list::{InvalidProcessName, ProcessName, Strategy};
use snafu::{OptionExt as _, ResultExt as _, Snafu, ensure};

/// One line of user input, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Command {
    /// `RQ <name> <size> <strategy>`
    #[display("RQ {name} {size} {}", strategy.letter())]
    Request {
        name: ProcessName,
        size: usize,
        strategy: Strategy,
    },
    /// `RL <name>`
    #[display("RL {name}")]
    Release { name: ProcessName },
    /// `C`
    #[display("C")]
    Compact,
    /// `STAT`
    #[display("STAT")]
    Stat,
    /// `X`
    #[display("X")]
    Exit,
}

/// A line that is not a well-formed command.
///
/// The display text is what the user sees; [`reason`](Self::reason) tells
/// which part of the line was wrong.
#[derive(Debug, Snafu)]
pub enum ParseCommandError {
    #[snafu(display("Invalid RQ format"))]
    InvalidRequest { reason: &'static str },
    #[snafu(display("Invalid RQ format"))]
    InvalidRequestName { source: InvalidProcessName },
    #[snafu(display("Invalid RL format"))]
    InvalidRelease { reason: &'static str },
    #[snafu(display("Invalid RL format"))]
    InvalidReleaseName { source: InvalidProcessName },
    #[snafu(display("Unknown command"))]
    UnknownCommand { keyword: String },
}

impl ParseCommandError {
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidRequest { reason } | Self::InvalidRelease { reason } => {
                (*reason).to_owned()
            }
            Self::InvalidRequestName { source } | Self::InvalidReleaseName { source } => {
                source.to_string()
            }
            Self::UnknownCommand { keyword } => format!("unknown keyword `{keyword}`"),
        }
    }
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseCommandError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let command = match (keyword, args.as_slice()) {
            ("RQ", args) => parse_request(args)?,
            ("RL", args) => parse_release(args)?,
            ("C", []) => Self::Compact,
            ("STAT", []) => Self::Stat,
            ("X", []) => Self::Exit,
            (keyword, _) => {
                return UnknownCommandSnafu { keyword }.fail();
            }
        };
        Ok(Some(command))
    }
}

fn parse_request(args: &[&str]) -> Result<Command, ParseCommandError> {
    let &[name, size, strategy] = args else {
        return InvalidRequestSnafu {
            reason: "expected `RQ <name> <size> <strategy>`",
        }
        .fail();
    };
    let name = ProcessName::new(name).context(InvalidRequestNameSnafu)?;
    let size = size
        .parse::<usize>()
        .ok()
        .context(InvalidRequestSnafu {
            reason: "size must be a positive integer",
        })?;
    ensure!(
        size > 0,
        InvalidRequestSnafu {
            reason: "size must be a positive integer",
        }
    );
    let strategy = strategy
        .parse::<Strategy>()
        .ok()
        .context(InvalidRequestSnafu {
            reason: "strategy must be one of F, B or W",
        })?;
    Ok(Command::Request {
        name,
        size,
        strategy,
    })
}

fn parse_release(args: &[&str]) -> Result<Command, ParseCommandError> {
    let &[name] = args else {
        return InvalidReleaseSnafu {
            reason: "expected `RL <name>`",
        }
        .fail();
    };
    let name = ProcessName::new(name).context(InvalidReleaseNameSnafu)?;
    Ok(Command::Release { name })
}
