pub const DEFAULT_QUAL_CUTOFF: f64 = 20.0;
pub const DEFAULT_KEEP_NR: bool = false;
pub const DEFAULT_WRITE_TABLES: bool = false;

pub const REPORT_FILE_NAME: &str = "GWAS_report.html";
pub const TABLE_DIR_NAME: &str = "data";
pub const MATCHES_TABLE_NAME: &str = "matches.csv";
pub const TRAIT_TABLE_NAME: &str = "trait_summary.csv";

/// Process exit status for malformed input.
pub const EXIT_PARSE_ERROR: i32 = 2;
/// Process exit status for I/O and every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Placeholder trait used by the GWAS Catalog for "not reported".
pub const NOT_REPORTED_TRAIT: &str = "NR";
/// Placeholder used in `STRONGEST SNP-RISK ALLELE` when the allele is unknown.
pub const UNKNOWN_RISK_ALLELE: &str = "?";

pub const VCF_FIXED_COLUMNS: [&str; 8] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO",
];
pub const MISSING_VALUE: &str = ".";
pub const FILTER_PASS: &str = "PASS";
