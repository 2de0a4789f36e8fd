use crate::{
    constants::TABLE_DIR_NAME,
    core::{
        config::RunConfig,
        intersect::{intersect, MatchRecord},
        summary::RunSummary,
        traits::{summarize_traits, TraitSummary},
    },
    io::{
        atomic_writer::commit_all, catalog_reader::load_catalog, report_writer::stage_report,
        table_writer::stage_tables, vcf_reader::VcfReader,
    },
    utils::util::Result,
};
use std::{path::PathBuf, time};


/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub matches: Vec<MatchRecord>,
    pub traits: Vec<TraitSummary>,
    pub report_path: PathBuf,
    pub table_paths: Vec<PathBuf>,
}

/// Loads the catalog, streams the VCF through the intersector and writes the report.
///
/// Both inputs are fully read before anything is written to the output directory.
pub fn map(config: &RunConfig) -> Result<RunOutput> {
    let mut summary = RunSummary::new();

    let start_timer = time::Instant::now();
    log::info!("Loading GWAS catalog {}", config.gwas_path.display());
    let (index, catalog_stats) = load_catalog(&config.gwas_path, config.keep_nr)?;
    summary.catalog = catalog_stats;
    log::info!(
        "Loaded {} associations in {:.2?}",
        summary.catalog.entries_loaded,
        start_timer.elapsed()
    );

    let start_timer = time::Instant::now();
    log::info!(
        "Intersecting {} (QUAL >= {}, match mode: {})",
        config.vcf_path.display(),
        config.qual_cutoff,
        config.match_mode
    );
    let mut reader = VcfReader::new(&config.vcf_path, config.qual_cutoff)?;
    let matches = intersect(reader.by_ref(), &index, config.match_mode, &mut summary)?;
    summary.vcf = reader.into_stats();
    log::info!("Intersection finished in {:.2?}", start_timer.elapsed());
    summary.log_summary();

    let traits = summarize_traits(&matches);

    // Nothing becomes visible in the output directory until every file rendered
    let report = stage_report(&config.output_dir, config, &summary, &matches, &traits)?;
    let tables = if config.write_tables {
        stage_tables(&config.output_dir, &matches, &traits)?
    } else {
        Vec::new()
    };
    let report_path = report.commit()?;
    log::info!("Report written to {}", report_path.display());
    let table_paths = commit_all(tables)?;
    if !table_paths.is_empty() {
        log::info!("Tables written to {}", config.output_dir.join(TABLE_DIR_NAME).display());
    }

    Ok(RunOutput {
        summary,
        matches,
        traits,
        report_path,
        table_paths,
    })
}
