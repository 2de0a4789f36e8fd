use super::readers::{open_input_reader, InputReader};
use crate::{
    constants::NOT_REPORTED_TRAIT,
    core::{
        catalog::{parse_risk_allele, CatalogEntry, CatalogIndex},
        summary::CatalogStats,
    },
    error::MapGwasError,
    utils::util::Result,
};
use csv::{ReaderBuilder, StringRecord};
use std::{io::BufRead, path::Path};

const CHROM_COLUMNS: &[&str] = &["CHR_ID", "CHROM", "CHR", "CHROMOSOME"];
const POS_COLUMNS: &[&str] = &["CHR_POS", "POS", "POSITION", "BP"];
const TRAIT_COLUMNS: &[&str] = &["DISEASE/TRAIT", "TRAIT", "MAPPED_TRAIT"];
const PVALUE_COLUMNS: &[&str] = &["P-VALUE", "PVALUE", "P_VALUE", "P"];
const GENE_COLUMNS: &[&str] = &["MAPPED_GENE", "REPORTED GENE(S)", "GENE"];
const SNPS_COLUMNS: &[&str] = &["SNPS", "SNP", "RSID"];
const REGION_COLUMNS: &[&str] = &["REGION"];
const RISK_ALLELE_COLUMNS: &[&str] = &["STRONGEST SNP-RISK ALLELE", "RISK_ALLELE"];
const RAF_COLUMNS: &[&str] = &["RISK ALLELE FREQUENCY", "RISK_ALLELE_FREQUENCY", "RAF"];
const TRAIT_GROUP_COLUMNS: &[&str] = &["GROUPS OF DISEASE/TRAIT", "TRAIT_GROUP"];
const TRAIT_URI_COLUMNS: &[&str] = &["MAPPED_TRAIT_URI"];
const TRAIT_DESCRIPTION_COLUMNS: &[&str] = &["MAPPED_TRAIT_DESCRIPTION", "TRAIT_DESCRIPTION"];

/// Positions of the recognised catalog columns within a header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogColumns {
    pub chrom: usize,
    pub pos: usize,
    pub trait_name: usize,
    pub p_value: Option<usize>,
    pub gene: Option<usize>,
    pub snps: Option<usize>,
    pub region: Option<usize>,
    pub risk_allele: Option<usize>,
    pub risk_allele_frequency: Option<usize>,
    pub trait_group: Option<usize>,
    pub trait_uri: Option<usize>,
    pub trait_description: Option<usize>,
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    // Aliases are ordered by preference
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().trim_matches('"').eq_ignore_ascii_case(alias))
    })
}

impl CatalogColumns {
    pub fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let chrom = find_column(headers, CHROM_COLUMNS);
        let pos = find_column(headers, POS_COLUMNS);
        let trait_name = find_column(headers, TRAIT_COLUMNS);

        match (chrom, pos, trait_name) {
            (Some(chrom), Some(pos), Some(trait_name)) => Ok(CatalogColumns {
                chrom,
                pos,
                trait_name,
                p_value: find_column(headers, PVALUE_COLUMNS),
                gene: find_column(headers, GENE_COLUMNS),
                snps: find_column(headers, SNPS_COLUMNS),
                region: find_column(headers, REGION_COLUMNS),
                risk_allele: find_column(headers, RISK_ALLELE_COLUMNS),
                risk_allele_frequency: find_column(headers, RAF_COLUMNS),
                trait_group: find_column(headers, TRAIT_GROUP_COLUMNS),
                trait_uri: find_column(headers, TRAIT_URI_COLUMNS),
                trait_description: find_column(headers, TRAIT_DESCRIPTION_COLUMNS),
            }),
            _ => {
                let missing = [
                    (chrom, CHROM_COLUMNS[0]),
                    (pos, POS_COLUMNS[0]),
                    (trait_name, TRAIT_COLUMNS[0]),
                ]
                .iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name.to_string())
                .collect();
                Err(MapGwasError::MissingCatalogColumns {
                    path: path.to_path_buf(),
                    missing,
                })
            }
        }
    }
}

fn text_field(record: &StringRecord, column: Option<usize>) -> Option<String> {
    let value = record.get(column?)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("NA") || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}

fn float_field(record: &StringRecord, column: Option<usize>) -> Option<f64> {
    text_field(record, column)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Splits a multi-locus value written as `a;b` or `a x b`.
fn split_loci(value: &str) -> Vec<&str> {
    value
        .split(';')
        .flat_map(|part| part.split(" x "))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Accepts integer positions and float-formatted integers such as `12345.0`.
fn parse_position(value: &str) -> Option<u64> {
    let value = value.trim();
    let pos = match value.parse::<u64>() {
        Ok(pos) => pos,
        Err(_) => {
            let float = value.parse::<f64>().ok()?;
            if float.fract() != 0.0 || float < 1.0 || float > u64::MAX as f64 {
                return None;
            }
            float as u64
        }
    };
    (pos >= 1).then_some(pos)
}

/// Outcome of turning one catalog row into index entries.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Entries(Vec<CatalogEntry>),
    NotReported,
    Skipped(String),
}

pub fn parse_catalog_row(record: &StringRecord, columns: &CatalogColumns, keep_nr: bool) -> RowOutcome {
    let Some(chrom_field) = text_field(record, Some(columns.chrom)) else {
        return RowOutcome::Skipped("missing chromosome".to_string());
    };
    let Some(pos_field) = text_field(record, Some(columns.pos)) else {
        return RowOutcome::Skipped("missing position".to_string());
    };
    let Some(trait_name) = text_field(record, Some(columns.trait_name)) else {
        return RowOutcome::Skipped("missing trait".to_string());
    };
    if !keep_nr && trait_name == NOT_REPORTED_TRAIT {
        return RowOutcome::NotReported;
    }

    let chroms = split_loci(&chrom_field);
    let positions = split_loci(&pos_field);
    if chroms.is_empty() || positions.is_empty() {
        return RowOutcome::Skipped(format!("empty locus '{chrom_field}:{pos_field}'"));
    }

    let template = CatalogEntry {
        trait_name,
        p_value: float_field(record, columns.p_value),
        gene: text_field(record, columns.gene),
        snps: text_field(record, columns.snps),
        region: text_field(record, columns.region),
        risk_allele: text_field(record, columns.risk_allele).and_then(|v| parse_risk_allele(&v)),
        risk_allele_frequency: float_field(record, columns.risk_allele_frequency),
        trait_group: text_field(record, columns.trait_group),
        trait_uri: text_field(record, columns.trait_uri),
        trait_description: text_field(record, columns.trait_description),
        ..Default::default()
    };

    let mut entries = Vec::with_capacity(positions.len());
    for (i, pos) in positions.iter().enumerate() {
        let Some(position) = parse_position(pos) else {
            return RowOutcome::Skipped(format!("invalid position '{pos}'"));
        };
        let chromosome = if chroms.len() == positions.len() {
            chroms[i]
        } else {
            chroms[0]
        };
        entries.push(CatalogEntry {
            chromosome: chromosome.to_string(),
            position,
            ..template.clone()
        });
    }
    RowOutcome::Entries(entries)
}

fn detect_delimiter(reader: &mut InputReader) -> Result<u8> {
    let buf = reader.fill_buf()?;
    let first_line = buf.split(|&b| b == b'\n').next().unwrap_or(&[]);
    Ok(if first_line.contains(&b'\t') { b'\t' } else { b',' })
}

/// Loads a plain or gzip-compressed GWAS catalog (CSV or TSV) into a coordinate index.
pub fn load_catalog(path: &Path, keep_nr: bool) -> Result<(CatalogIndex, CatalogStats)> {
    log::trace!("Start loading GWAS catalog {:?}", path);
    let mut input = open_input_reader(path)?;
    let delimiter = detect_delimiter(&mut input)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(MapGwasError::MissingCatalogColumns {
            path: path.to_path_buf(),
            missing: vec![
                CHROM_COLUMNS[0].to_string(),
                POS_COLUMNS[0].to_string(),
                TRAIT_COLUMNS[0].to_string(),
            ],
        });
    }
    let columns = CatalogColumns::from_headers(&headers, path)?;
    log::debug!("GWAS catalog columns: {:?}", columns);

    let mut index = CatalogIndex::new();
    let mut stats = CatalogStats::default();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                stats.rows_read += 1;
                stats.rows_skipped += 1;
                log::debug!("Skipping unreadable catalog row in {}: {e}", path.display());
                continue;
            }
        }
        stats.rows_read += 1;
        match parse_catalog_row(&record, &columns, keep_nr) {
            RowOutcome::Entries(entries) => {
                for entry in entries {
                    index.insert(entry);
                }
            }
            RowOutcome::NotReported => stats.rows_nr_filtered += 1,
            RowOutcome::Skipped(reason) => {
                stats.rows_skipped += 1;
                log::debug!(
                    "Skipping catalog row {} in {}: {reason}",
                    stats.rows_read,
                    path.display()
                );
            }
        }
    }

    stats.entries_loaded = index.len();
    stats.coordinates = index.n_coordinates();
    log::trace!("Finished loading GWAS catalog {:?}", path);
    Ok((index, stats))
}
