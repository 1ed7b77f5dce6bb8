//! Terminal logging
//!
//! Human-facing progress messages go to stderr with a colored level tag, so
//! stdout stays clean for record output. Diagnostics (HTTP calls, builder
//! decisions) go through `tracing` and are only shown with `--verbose` or
//! `RUST_LOG`.

use colored::{Color, Colorize};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Success,
}

impl Level {
  fn tag(&self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Success => "done",
    }
  }

  fn color(&self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Success => Color::Green,
    }
  }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
  let default_directives = if verbose { "quill=debug,scribe=debug,warn" } else { "warn" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

  // A second init (e.g. from tests) is not an error worth surfacing
  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init();
}

/// Prefix each line of `message` with the level tag
pub fn format_lines(level: Level, message: &str) -> Vec<String> {
  let tag = format!("[{}]", level.tag().color(level.color()).bold());
  let pad = " ".repeat(5usize.saturating_sub(level.tag().len()));
  message.lines().map(|line| format!("{tag}{pad} {line}")).collect()
}

pub fn log(level: Level, message: &str) {
  for line in format_lines(level, message) {
    eprintln!("{line}");
  }
}

pub fn info(message: &str) {
  log(Level::Info, message);
}

pub fn warn(message: &str) {
  log(Level::Warn, message);
}

pub fn error(message: &str) {
  log(Level::Error, message);
}

pub fn success(message: &str) {
  log(Level::Success, message);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_lines_prefixes_every_line() {
    colored::control::set_override(false);

    let lines = format_lines(Level::Warn, "first\nsecond");
    assert_eq!(lines, vec!["[warn]  first".to_string(), "[warn]  second".to_string()]);

    let lines = format_lines(Level::Error, "boom");
    assert_eq!(lines, vec!["[error] boom".to_string()]);
  }
}
