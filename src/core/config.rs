use super::intersect::MatchMode;
use crate::cli::Cli;
use std::path::PathBuf;

/// Immutable settings of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub vcf_path: PathBuf,
    pub gwas_path: PathBuf,
    pub output_dir: PathBuf,
    pub qual_cutoff: f64,
    pub match_mode: MatchMode,
    pub keep_nr: bool,
    pub write_tables: bool,
}

impl RunConfig {
    pub fn new(
        vcf_path: impl Into<PathBuf>,
        gwas_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        qual_cutoff: f64,
    ) -> Self {
        RunConfig {
            vcf_path: vcf_path.into(),
            gwas_path: gwas_path.into(),
            output_dir: output_dir.into(),
            qual_cutoff,
            match_mode: MatchMode::default(),
            keep_nr: crate::DEFAULT_KEEP_NR,
            write_tables: crate::DEFAULT_WRITE_TABLES,
        }
    }

    pub fn with(mut self, updates: impl FnOnce(&mut Self)) -> Self {
        updates(&mut self);
        self
    }
}

impl From<&Cli> for RunConfig {
    fn from(cli: &Cli) -> Self {
        RunConfig {
            vcf_path: cli.vcf.clone(),
            gwas_path: cli.gwas.clone(),
            output_dir: cli.out.clone(),
            qual_cutoff: cli.qual_cutoff,
            match_mode: cli.match_mode,
            keep_nr: cli.keep_nr,
            write_tables: cli.write_tables,
        }
    }
}
