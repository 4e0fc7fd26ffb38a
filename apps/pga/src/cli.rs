//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use pga_types::ColorChoice;
use std::path::PathBuf;

/// pga - keep a local Public Git Archive mirror honest
#[derive(Parser)]
#[command(name = "pga")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check a local Public Git Archive mirror against its remote source")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the cache log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Report which siva files in the local mirror are corrupted or out of date
    #[command(alias = "st")]
    Status(StatusArgs),
}

/// Arguments for `pga status`
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Take list of siva files from standard input
    #[arg(short = 'i', long)]
    pub stdin: bool,

    /// Path where the siva files are stored
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of concurrent checks allowed
    #[arg(short, long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Regular expression the repository URL must match
    #[arg(short, long, value_name = "REGEX")]
    pub url: Option<String>,

    /// Languages every selected repository must contain
    #[arg(short, long = "lang", value_name = "LANG", value_delimiter = ',')]
    pub langs: Vec<String>,

    /// Catalog location (local path or URL)
    #[arg(long, value_name = "PATH|URL")]
    pub index: Option<String>,
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    let jobs: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if jobs == 0 {
        return Err("at least one concurrent check is required".to_string());
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_args(args: &[&str]) -> StatusArgs {
        let mut argv = vec!["pga", "status"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Status(args) => args,
        }
    }

    #[test]
    fn test_status_defaults() {
        let args = status_args(&[]);
        assert!(!args.stdin);
        assert!(args.output.is_none());
        assert!(args.jobs.is_none());
        assert!(args.url.is_none());
        assert!(args.langs.is_empty());
    }

    #[test]
    fn test_status_flags() {
        let args = status_args(&[
            "-i",
            "-o",
            "/srv/pga",
            "-j",
            "4",
            "-u",
            "github.com/src-d/.*",
            "--index",
            "https://example.com/latest.csv.gz",
        ]);
        assert!(args.stdin);
        assert_eq!(args.output, Some(PathBuf::from("/srv/pga")));
        assert_eq!(args.jobs, Some(4));
        assert_eq!(args.url.as_deref(), Some("github.com/src-d/.*"));
        assert_eq!(
            args.index.as_deref(),
            Some("https://example.com/latest.csv.gz")
        );
    }

    #[test]
    fn test_lang_accepts_lists_and_repeats() {
        let args = status_args(&["-l", "Go,Python", "--lang", "Rust"]);
        assert_eq!(args.langs, vec!["Go", "Python", "Rust"]);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["pga", "status", "-j", "0"]).is_err());
        assert!(Cli::try_parse_from(["pga", "status", "-j", "many"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pga", "status", "--json", "--color", "never"]).unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.color, Some(ColorChoice::Never));
    }
}
