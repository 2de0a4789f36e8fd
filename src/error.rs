use std::path::PathBuf;
use thiserror::Error;

pub type MapGwasResult<T> = std::result::Result<T, MapGwasError>;

#[derive(Debug, Error)]
pub enum MapGwasError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
    #[error("Parse error in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("Missing VCF header in {}: no #CHROM line found", path.display())]
    MissingVcfHeader { path: PathBuf },
    #[error(
        "No recognizable GWAS catalog columns in {}: missing {}",
        path.display(),
        missing.join(", ")
    )]
    MissingCatalogColumns { path: PathBuf, missing: Vec<String> },
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
    #[error("Failed to open {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Output directory {} is not writable: {source}", path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MapGwasError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// True for structural input errors, false for I/O failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::MissingVcfHeader { .. } | Self::MissingCatalogColumns { .. }
        )
    }
}

#[macro_export]
macro_rules! mapgwas_error {
    ($($arg:tt)*) => {
        $crate::error::MapGwasError::message(format!($($arg)*))
    };
}
