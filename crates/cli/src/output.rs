//! Terminal rendering of a hoist report.
//!
//! Text output shows one block per store entry with the members folded into
//! it, then a warning per rolled-back file, then the run totals. Colors are
//! only emitted when the target stream supports them.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use hoist_lib::{FileFailure, StoreEntryReport};

const DIGEST_PREFIX_LEN: usize = 12;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Note,
  Warn,
  Fail,
}

impl Status {
  pub fn symbol(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Note => "•",
      Status::Warn => "⚠",
      Status::Fail => "✗",
    }
  }

  /// `Done` and `Note` go to stdout, `Warn` and `Fail` to stderr.
  pub fn print(self, message: &str) {
    let symbol = self.symbol();
    match self {
      Status::Done => println!("{} {}", symbol.if_supports_color(Stream::Stdout, |s| s.green()), message),
      Status::Note => println!("{} {}", symbol.if_supports_color(Stream::Stdout, |s| s.blue()), message),
      Status::Warn => eprintln!(
        "{} {}",
        symbol.if_supports_color(Stream::Stderr, |s| s.yellow()),
        message.if_supports_color(Stream::Stderr, |s| s.yellow())
      ),
      Status::Fail => eprintln!(
        "{} {}",
        symbol.if_supports_color(Stream::Stderr, |s| s.red()),
        message.if_supports_color(Stream::Stderr, |s| s.red())
      ),
    }
  }
}

pub fn short_digest(digest: &str) -> &str {
  digest.get(..DIGEST_PREFIX_LEN).unwrap_or(digest)
}

/// `+` for an entry created by this run, `=` for one already in the store.
pub fn entry_marker(entry: &StoreEntryReport) -> &'static str {
  if entry.created { "+" } else { "=" }
}

pub fn entry_summary(entry: &StoreEntryReport) -> String {
  let origin = if entry.created { "new" } else { "existing" };
  format!(
    "{} → {} file(s) folded into {} entry",
    short_digest(entry.digest.as_str()),
    entry.folded,
    origin
  )
}

pub fn member_line(member: &Path) -> String {
  format!("    - {}", member.display())
}

pub fn rollback_message(failure: &FileFailure) -> String {
  format!(
    "Could not link {}: {} (original restored)",
    failure.path.display(),
    failure.error
  )
}

pub fn print_entry(store_path: &Path, entry: &StoreEntryReport) {
  println!(
    "{} {}",
    entry_marker(entry).if_supports_color(Stream::Stdout, |s| s.green()),
    entry_summary(entry)
  );
  println!(
    "    {}",
    store_path.display().if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
  for member in &entry.members {
    println!("{}", member_line(member));
  }
}

pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
  println!("{}", json);
  Ok(())
}

pub fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

pub fn format_elapsed(elapsed: Duration) -> String {
  match elapsed.as_secs() {
    0 => format!("{}ms", elapsed.as_millis()),
    1..=59 => format!("{:.2}s", elapsed.as_secs_f64()),
    secs => format!("{}m {}s", secs / 60, secs % 60),
  }
}
