//! Logger setup.
//!
//! Command output goes through the `log` facade: `info` lines are printed
//! bare to stdout, warnings and errors get a coloured prefix, and `--verbose`
//! adds timestamps and debug records from the toolshelf crates. With
//! `--logfile` every line is also appended to a file with ANSI escapes
//! removed.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    // Dependencies stay at warn; `RUST_LOG` can still open them up.
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("toolshelf", level)
        .parse_default_env();

    builder.format(move |buf, record| {
        let message = record.args();
        match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                message
            ),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                message
            ),
            Level::Info if !verbose => writeln!(buf, "{message}"),
            level => {
                let ts = buf.timestamp_millis();
                writeln!(
                    buf,
                    "{} {} {}",
                    ts,
                    level.if_supports_color(Stdout, |t| t.dimmed()),
                    message
                )
            }
        }
    });

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::config(format!("cannot open log file {}: {e}", path.display())))?;
            builder.target(Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::runtime(format!("logger already initialized: {e}")))
}

/// Writes to stdout and, with ANSI escapes stripped, to a file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}
