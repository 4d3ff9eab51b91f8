//! flagtree CLI
//!
//! Builds the default experiment configuration from an optional document
//! and trailing overrides, then prints the frozen result.

use clap::Parser;
use flagtree::env::project_device_env;
use flagtree::logging::init_logging;
use flagtree::{build_config, default_schema, BuildOptions, DocumentFormat, SystemClock};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "flagtree")]
#[command(about = "Typed hierarchical experiment configuration", version)]
struct Cli {
    /// Path to a configuration document (.toml, .yaml, .yml or .json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Skip writing the snapshot into the log directory
    #[arg(long)]
    no_backup: bool,

    /// Do not export CUDA_VISIBLE_DEVICES
    #[arg(long)]
    no_env: bool,

    /// Output format of the printed configuration
    #[arg(long, value_enum, default_value_t = DocumentFormat::Toml)]
    format: DocumentFormat,

    /// Overrides: `PATH VALUE` pairs or `PATH=VALUE` tokens
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    opts: Vec<String>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> flagtree::Result<()> {
    let options = BuildOptions {
        config: cli.config,
        overrides: cli.opts,
        invocation: invocation_from(std::env::args_os()),
        backup: !cli.no_backup,
        ..BuildOptions::default()
    };

    let outcome = build_config(default_schema()?, &options, &SystemClock)?;

    if let Some(e) = &outcome.snapshot_error {
        eprintln!("warning: {}", e);
    }

    if !cli.no_env {
        project_device_env(&outcome.config)?;
    }

    print!("{}", outcome.config.render(cli.format)?);
    Ok(())
}

/// Process arguments as text. Non-UTF-8 bytes are replaced, never fatal.
fn invocation_from(args: impl IntoIterator<Item = OsString>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_from_utf8() {
        let args = vec![OsString::from("flagtree"), OsString::from("SOLVER.lr=0.1")];
        assert_eq!(invocation_from(args), vec!["flagtree", "SOLVER.lr=0.1"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_invocation_from_non_utf8_path() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("--config"),
            OsString::from_vec(vec![b'r', 0xff, b'.', b't', b'o', b'm', b'l']),
        ];
        assert_eq!(invocation_from(args), vec!["--config", "r\u{fffd}.toml"]);
    }
}
