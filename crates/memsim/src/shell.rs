//! The interactive command loop.
//!
//! Lines are read one at a time, parsed into [`Command`]s and applied to the
//! [`BlockList`]. Malformed lines and failed operations print an `Error: ...`
//! line and leave the memory untouched; the loop keeps going until `X` or the
//! end of input.

use std::io::{self, BufRead, Write};

use ansi_term::{Color, WithFg};
use block_list::{AllocError, BlockList, MemoryStats};

use crate::command::Command;

pub const PROMPT: &str = "allocator>";

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    /// Print [`PROMPT`] before reading each line.
    pub prompt: bool,
    /// Follow each `STAT` report with a usage summary line.
    pub summary: bool,
}

pub struct Shell<W> {
    memory: BlockList,
    output: W,
    options: ShellOptions,
}

impl<W> Shell<W>
where
    W: Write,
{
    pub fn new(memory: BlockList, output: W, options: ShellOptions) -> Self {
        Self {
            memory,
            output,
            options,
        }
    }

    #[cfg(test)]
    pub fn memory(&self) -> &BlockList {
        &self.memory
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs commands from `input` until `X` or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD before the
    /// line is parsed.
    pub fn run<R>(&mut self, mut input: R) -> io::Result<()>
    where
        R: BufRead,
    {
        let mut buf = Vec::new();
        loop {
            if self.options.prompt {
                write!(self.output, "{PROMPT}")?;
                self.output.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input");
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            let Some(command) = self.parse(line)? else {
                continue;
            };
            if command.is_exit() {
                debug!("exit requested");
                break;
            }
            self.execute(command)?;
        }
        self.output.flush()
    }

    fn parse(&mut self, line: &str) -> io::Result<Option<Command>> {
        match Command::parse(line) {
            Ok(command) => Ok(command),
            Err(err) => {
                info!("rejected {line:?}: {}", err.reason());
                self.print_error(&err)?;
                Ok(None)
            }
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        debug!("executing `{command}`");
        match command {
            Command::Request {
                name,
                size,
                strategy,
            } => match self.memory.allocate(name, size, strategy) {
                Ok(range) => {
                    trace!("allocated [{}:{}] to {name} ({strategy})", range.start, range.end - 1);
                }
                Err(err) => self.allocation_failed(&err)?,
            },
            Command::Release { name } => match self.memory.release(&name) {
                Ok(range) => {
                    trace!("released [{}:{}] held by {name}", range.start, range.end - 1);
                }
                Err(err) => self.print_error(&err)?,
            },
            Command::Compact => {
                self.memory.compact();
                trace!("compacted into {} segment(s)", self.memory.segments().len());
            }
            Command::Stat => self.print_status()?,
            Command::Exit => {}
        }
        Ok(())
    }

    fn allocation_failed(&mut self, err: &AllocError) -> io::Result<()> {
        if let AllocError::OutOfMemory { size, .. } = err
            && let Some(hint) = compaction_hint(&self.memory.stats(), *size)
        {
            warn!("{hint}");
        }
        self.print_error(err)
    }

    fn print_error(&mut self, err: &dyn std::error::Error) -> io::Result<()> {
        writeln!(self.output, "{} {err}", WithFg::new(Color::Red, "Error:"))
    }

    fn print_status(&mut self) -> io::Result<()> {
        for entry in self.memory.report() {
            writeln!(self.output, "{entry}")?;
        }
        if self.options.summary {
            let stats = self.memory.stats();
            writeln!(self.output, "{}", WithFg::new(Color::DarkGray, stats))?;
        }
        Ok(())
    }
}

fn compaction_hint(stats: &MemoryStats, size: usize) -> Option<String> {
    (stats.free >= size).then(|| {
        format!(
            "{} bytes are free in {} holes but no single hole fits {size}, \
             compaction would satisfy the request",
            stats.free, stats.holes
        )
    })
}
