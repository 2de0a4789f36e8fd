use clap::Parser;
use mapgwas::{
    cli::{init_verbose, Cli, FULL_VERSION},
    commands::map,
    core::config::RunConfig,
    utils::util::{handle_error_and_exit, Result},
};
use std::time;

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    log::trace!("CLI options set: {:?}", cli);

    log::info!("Running {}-{}", env!("CARGO_PKG_NAME"), &**FULL_VERSION);

    let start_timer = time::Instant::now();
    let config = RunConfig::from(&cli);
    log::trace!("Run configuration: {:#?}", config);
    let output = map(&config)?;
    log::info!(
        "{} matches written to {}",
        output.matches.len(),
        output.report_path.display()
    );
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());

    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
