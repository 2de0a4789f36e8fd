pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod catalog;
    pub mod chrom;
    pub mod config;
    pub mod intersect;
    pub mod summary;
    pub mod traits;
    pub mod variant;
}

pub mod io {
    pub mod atomic_writer;
    pub mod catalog_reader;
    pub mod readers;
    pub mod report_writer;
    pub mod table_writer;
    pub mod vcf_reader;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
