//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arcguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and extract an archive
    Decompress(DecompressArgs),
    /// Validate an archive without extracting it
    Validate(ValidateArgs),
}

/// A numeric threshold given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Value(u64),
    Unlimited,
}

impl Limit {
    pub const fn into_option(self) -> Option<u64> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unlimited => None,
        }
    }
}

#[derive(clap::Args)]
pub struct ThresholdArgs {
    /// Maximum number of non-directory members, or `none`
    #[arg(long, value_name = "N", value_parser = parse_count_limit)]
    pub max_objects: Option<Limit>,

    /// Maximum total uncompressed size (suffixes K, M, G, T), or `none`
    #[arg(long, value_name = "SIZE", value_parser = parse_size_limit)]
    pub max_size: Option<Limit>,

    /// Maximum compression ratio, or `none`
    #[arg(long, value_name = "N", value_parser = parse_count_limit)]
    pub max_ratio: Option<Limit>,

    /// Threshold configuration file (default: /etc/arcguard/arcguard.conf)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct DecompressArgs {
    /// Archive path, or a glfs:// URL read through gfcat
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Extraction directory
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Replace files that already exist in the destination
    #[arg(long)]
    pub allow_overwrite: bool,

    /// Extract member by member instead of validating everything first
    #[arg(long)]
    pub no_precheck: bool,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination to check member paths and overwrites against
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Treat existing files in DEST as replaceable
    #[arg(long, requires = "dest")]
    pub allow_overwrite: bool,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

fn parse_limit(s: &str, parse: fn(&str) -> Result<u64, String>) -> Result<Limit, String> {
    if s.trim().eq_ignore_ascii_case("none") {
        Ok(Limit::Unlimited)
    } else {
        parse(s).map(Limit::Value)
    }
}

fn parse_count(s: &str) -> Result<u64, String> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid number: {s}"))
}

fn parse_count_limit(s: &str) -> Result<Limit, String> {
    parse_limit(s, parse_count)
}

fn parse_size_limit(s: &str) -> Result<Limit, String> {
    parse_limit(s, parse_byte_size)
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("4T").unwrap(), 4 * 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_parse_limits() {
        assert_eq!(parse_count_limit("3").unwrap(), Limit::Value(3));
        assert_eq!(parse_count_limit("none").unwrap(), Limit::Unlimited);
        assert_eq!(parse_count_limit("NONE").unwrap(), Limit::Unlimited);
        assert_eq!(parse_size_limit("2K").unwrap(), Limit::Value(2048));
        assert_eq!(parse_size_limit("none").unwrap(), Limit::Unlimited);
        assert!(parse_count_limit("-1").is_err());
        assert!(parse_count_limit("1K").is_err());
    }

    #[test]
    fn test_decompress_args() {
        let cli = Cli::try_parse_from([
            "arcguard",
            "decompress",
            "in.tar",
            "out",
            "--no-precheck",
            "--max-ratio",
            "none",
            "--max-objects",
            "5",
        ])
        .unwrap();
        let Commands::Decompress(args) = cli.command else {
            panic!("expected decompress");
        };
        assert!(args.no_precheck);
        assert!(!args.allow_overwrite);
        assert_eq!(args.thresholds.max_ratio, Some(Limit::Unlimited));
        assert_eq!(args.thresholds.max_objects, Some(Limit::Value(5)));
        assert_eq!(args.thresholds.max_size, None);
    }
}
