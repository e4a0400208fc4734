//! Implementation of the `hoist <ROOT>` command.
//!
//! Scans the root, hoists every duplicate group into the store and prints a
//! summary of what was folded and how much space was reclaimed.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use hoist_lib::{HoistConfig, HoistReport, hoist_tree};

use crate::output::{
  OutputFormat, Status, format_elapsed, format_size, print_entry, print_json, print_stat, rollback_message,
};

pub struct HoistOptions {
  pub root: PathBuf,
  pub store_dir: String,
  pub dry_run: bool,
  pub output: OutputFormat,
}

/// Execute the hoist.
///
/// Returns `Ok(false)` when the run finished but some files could not be
/// linked and were restored.
pub fn cmd_hoist(options: &HoistOptions) -> Result<bool> {
  let start = Instant::now();

  let config = HoistConfig::default()
    .with_store_dir(options.store_dir.as_str())
    .with_dry_run(options.dry_run);

  info!(root = %options.root.display(), store_dir = %config.store_dir_name, dry_run = config.dry_run, "starting hoist");

  let report = hoist_tree(&options.root, &config)
    .with_context(|| format!("Failed to hoist duplicates under {}", options.root.display()))?;

  if options.output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report, start);
  }

  Ok(!report.has_failures())
}

fn print_report(report: &HoistReport, start: Instant) {
  for (store_path, entry) in &report.entries {
    print_entry(store_path, entry);
  }

  for failure in &report.failures {
    Status::Warn.print(&rollback_message(failure));
  }

  println!();
  if report.dry_run {
    Status::Note.print("Dry run - no changes made");
  } else if report.has_failures() {
    Status::Warn.print(&format!("{} file(s) could not be hoisted", report.failures.len()));
  } else {
    Status::Done.print("Duplicate files hoisted and links created successfully.");
  }
  print_stat("Files scanned", &report.files_scanned.to_string());
  print_stat("Files hoisted", &report.files_hoisted().to_string());
  print_stat(
    "Store entries",
    &format!("{} ({} new)", report.entries.len(), report.entries_created()),
  );
  print_stat("Space saved", &format_size(report.bytes_saved()));
  print_stat("Duration", &format_elapsed(start.elapsed()));
}
