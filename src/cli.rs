use crate::{constants::*, core::intersect::MatchMode};
use anyhow::anyhow;
use clap::{ArgAction, Parser};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{io::Write, path::PathBuf};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
/// * `0.1.0` - when built outside of a git checkout
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = option_env!("VERGEN_GIT_DESCRIBE").unwrap_or_default();
    if git_describe.is_empty() || git_describe == "VERGEN_IDEMPOTENT_OUTPUT" {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug, Clone)]
#[command(name="mapgwas",
          version=&**FULL_VERSION,
          about="Map VCF variants to a GWAS catalog and generate an HTML report",
          long_about = None,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// VCF file with variant calls (.vcf or .vcf.gz)
    #[arg(long = "vcf", value_name = "VCF")]
    pub vcf: PathBuf,

    /// GWAS catalog, comma- or tab-separated (optionally gzip-compressed)
    #[arg(long = "gwas", value_name = "GWAS")]
    pub gwas: PathBuf,

    /// Output directory for the report, created if absent
    #[arg(long = "out", value_name = "DIR")]
    pub out: PathBuf,

    /// Minimum QUAL for a variant to be considered; records without QUAL never pass
    #[arg(
        long = "qual-cutoff",
        value_name = "QUAL",
        default_value_t = DEFAULT_QUAL_CUTOFF,
        value_parser = finite_float
    )]
    pub qual_cutoff: f64,

    /// How variants and catalog entries at the same coordinate are matched
    #[arg(long = "match-mode", value_enum, default_value_t = MatchMode::Position)]
    pub match_mode: MatchMode,

    /// Keep catalog rows whose trait is NR (not reported)
    #[arg(long = "keep-nr", default_value_t = DEFAULT_KEEP_NR, help_heading = "Advanced")]
    pub keep_nr: bool,

    /// Also write the matches and trait summary as CSV tables under <DIR>/data
    #[arg(
        long = "write-tables",
        default_value_t = DEFAULT_WRITE_TABLES,
        help_heading = "Advanced"
    )]
    pub write_tables: bool,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

/// Initializes the logger from the number of `-v`/`--verbose` flags.
///
/// No flag logs at info level, one at debug level and two or more at trace level.
/// `RUST_LOG` is still honoured for module-level filters.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

/// Parses a QUAL cutoff, rejecting NaN and infinities.
fn finite_float(s: &str) -> anyhow::Result<f64> {
    let value: f64 = s
        .parse::<f64>()
        .map_err(|_| anyhow!("`{}` is not a valid number", s))?;
    if !value.is_finite() {
        return Err(anyhow!("QUAL cutoff must be finite, got `{}`", s));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from([
            "mapgwas", "--vcf", "in.vcf", "--gwas", "gwas.tsv", "--out", "out",
        ])
        .unwrap();
        assert_eq!(cli.qual_cutoff, DEFAULT_QUAL_CUTOFF);
        assert_eq!(cli.match_mode, MatchMode::Position);
        assert!(!cli.keep_nr);
        assert!(!cli.write_tables);
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_cli_all_options() {
        let cli = Cli::try_parse_from([
            "mapgwas",
            "--vcf",
            "in.vcf.gz",
            "--gwas",
            "gwas.csv.gz",
            "--out",
            "report",
            "--qual-cutoff",
            "30.5",
            "--match-mode",
            "allele",
            "--keep-nr",
            "--write-tables",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.qual_cutoff, 30.5);
        assert_eq!(cli.match_mode, MatchMode::Allele);
        assert!(cli.keep_nr);
        assert!(cli.write_tables);
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.out, PathBuf::from("report"));
    }

    #[test]
    fn test_cli_rejects_bad_cutoff() {
        for bad in ["abc", "NaN", "inf"] {
            let result = Cli::try_parse_from([
                "mapgwas", "--vcf", "a", "--gwas", "b", "--out", "c", "--qual-cutoff", bad,
            ]);
            assert!(result.is_err(), "cutoff {bad} should be rejected");
        }
    }

    #[test]
    fn test_cli_requires_inputs() {
        assert!(Cli::try_parse_from(["mapgwas", "--vcf", "a", "--out", "c"]).is_err());
    }

    #[test]
    fn test_finite_float() {
        assert_eq!(finite_float("-1.5").unwrap(), -1.5);
        assert!(finite_float("").is_err());
    }
}
