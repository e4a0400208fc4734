mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::EnvFilter;

use hoist_lib::consts::STORE_DIR_NAME;

use crate::output::{OutputFormat, Status};

/// hoist - move duplicate files into a content-addressed store and replace them with symlinks
#[derive(Parser)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
struct Cli {
  /// Root directory to deduplicate
  root: PathBuf,

  /// Show what would be hoisted without changing anything
  #[arg(long)]
  dry_run: bool,

  /// Name of the store directory created under the root
  #[arg(long, value_name = "NAME", default_value = STORE_DIR_NAME)]
  store_dir: String,

  /// Enable debug logging
  #[arg(long)]
  verbose: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t)]
  output: OutputFormat,
}

/// `-v` prints the version, so `--verbose` has no short form.
fn command() -> Command {
  Cli::command().arg(
    Arg::new("version")
      .short('v')
      .long("version")
      .action(ArgAction::Version)
      .help("Print version"),
  )
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn parse_args() -> Result<Cli, ExitCode> {
  let parsed = command()
    .try_get_matches()
    .and_then(|matches| Cli::from_arg_matches(&matches));

  match parsed {
    Ok(cli) => Ok(cli),
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      let _ = err.print();
      Err(ExitCode::SUCCESS)
    }
    Err(err) => {
      // Usage goes to stdout, the parse error itself to stderr.
      let _ = command().print_help();
      println!();
      eprint!("{}", err.render());
      Err(ExitCode::FAILURE)
    }
  }
}

fn main() -> ExitCode {
  let cli = match parse_args() {
    Ok(cli) => cli,
    Err(code) => return code,
  };

  init_logging(cli.verbose);

  let options = cmd::HoistOptions {
    root: cli.root,
    store_dir: cli.store_dir,
    dry_run: cli.dry_run,
    output: cli.output,
  };

  match cmd::cmd_hoist(&options) {
    Ok(true) => ExitCode::SUCCESS,
    Ok(false) => ExitCode::FAILURE,
    Err(err) => {
      Status::Fail.print(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
