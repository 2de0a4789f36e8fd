use super::readers::{open_input_reader, InputReader};
use crate::{
    constants::{MISSING_VALUE, VCF_FIXED_COLUMNS},
    core::{summary::VcfStats, variant::Variant},
    error::MapGwasError,
    utils::util::Result,
};
use noodles_vcf as vcf;
use noodles_vcf::variant::record::{AlternateBases, Filters, Ids};
use std::{
    fmt,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

/// Why a data line was left out of the variant stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InvalidUtf8,
    TooFewFields(usize),
    InvalidRecord(String),
    EmptyChromosome,
    InvalidPosition(String),
    EmptyReference,
    InvalidAlternate(String),
    InvalidQuality(String),
    InvalidFilter(String),
    MisplacedHeader,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
            SkipReason::TooFewFields(n) => write!(
                f,
                "expected at least {} tab-separated fields, found {n}",
                VCF_FIXED_COLUMNS.len()
            ),
            SkipReason::InvalidRecord(e) => write!(f, "invalid record: {e}"),
            SkipReason::EmptyChromosome => write!(f, "empty CHROM"),
            SkipReason::InvalidPosition(e) => write!(f, "invalid POS: {e}"),
            SkipReason::EmptyReference => write!(f, "empty REF"),
            SkipReason::InvalidAlternate(e) => write!(f, "invalid ALT: {e}"),
            SkipReason::InvalidQuality(e) => write!(f, "invalid QUAL: {e}"),
            SkipReason::InvalidFilter(e) => write!(f, "invalid FILTER: {e}"),
            SkipReason::MisplacedHeader => write!(f, "header line after #CHROM"),
        }
    }
}

// f32 QUAL widened through its shortest decimal form, so `29.9` compares as 29.9
fn widen_quality(q: f32) -> f64 {
    q.to_string().parse().unwrap_or(f64::from(q))
}

/// Converts one VCF data line into a [`Variant`], reusing `record` as the parse buffer.
pub fn parse_record_line(
    line: &str,
    header: &vcf::Header,
    record: &mut vcf::Record,
) -> std::result::Result<Variant, SkipReason> {
    if line.starts_with('#') {
        return Err(SkipReason::MisplacedHeader);
    }
    let n_fields = line.split('\t').count();
    if n_fields < VCF_FIXED_COLUMNS.len() {
        return Err(SkipReason::TooFewFields(n_fields));
    }

    let mut line_reader = vcf::io::Reader::new(line.as_bytes());
    match line_reader.read_record(record) {
        Ok(0) => return Err(SkipReason::InvalidRecord("empty line".to_string())),
        Ok(_) => {}
        Err(e) => return Err(SkipReason::InvalidRecord(e.to_string())),
    }

    let chromosome = record.reference_sequence_name().trim().to_string();
    if chromosome.is_empty() {
        return Err(SkipReason::EmptyChromosome);
    }

    let position = match record.variant_start() {
        Some(Ok(pos)) => usize::from(pos) as u64,
        Some(Err(e)) => return Err(SkipReason::InvalidPosition(e.to_string())),
        None => return Err(SkipReason::InvalidPosition("position must be >= 1".to_string())),
    };

    let ids_field = record.ids();
    let ids: Vec<&str> = ids_field.iter().collect();
    let id = if ids.is_empty() {
        None
    } else {
        Some(ids.join(";"))
    };

    let ref_allele = record.reference_bases().to_string();
    if ref_allele.is_empty() || ref_allele == MISSING_VALUE {
        return Err(SkipReason::EmptyReference);
    }

    let alt_alleles = record
        .alternate_bases()
        .iter()
        .filter(|allele| !matches!(allele, Ok(MISSING_VALUE)))
        .map(|allele| allele.map(str::to_string))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| SkipReason::InvalidAlternate(e.to_string()))?;

    let quality = match record.quality_score() {
        None => None,
        Some(Ok(q)) if !q.is_nan() => Some(widen_quality(q)),
        Some(Ok(q)) => return Err(SkipReason::InvalidQuality(q.to_string())),
        Some(Err(e)) => return Err(SkipReason::InvalidQuality(e.to_string())),
    };

    let filters = record.filters();
    let names = if filters.is_empty() {
        Vec::new()
    } else {
        filters
            .iter(header)
            .filter(|name| !matches!(name, Ok("") | Ok(MISSING_VALUE)))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| SkipReason::InvalidFilter(e.to_string()))?
    };
    let filter_status = if names.is_empty() {
        MISSING_VALUE.to_string()
    } else {
        names.join(";")
    };

    Ok(Variant {
        chromosome,
        position,
        id,
        ref_allele,
        alt_alleles,
        quality,
        filter_status,
    })
}

/// Reads one raw line into `buf` without its line terminator. Returns false at EOF.
fn read_raw_line(reader: &mut InputReader, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(true)
}

/// Streaming VCF reader yielding only the variants that pass the QUAL cutoff.
///
/// The header is validated eagerly in [`VcfReader::new`]; data lines are parsed
/// lazily. Malformed records and records below the cutoff are tallied in
/// [`VcfReader::stats`] instead of being returned.
pub struct VcfReader {
    path: PathBuf,
    input: InputReader,
    header: vcf::Header,
    record: vcf::Record,
    buf: Vec<u8>,
    line_number: usize,
    qual_cutoff: f64,
    stats: VcfStats,
}

impl VcfReader {
    pub fn new(path: &Path, qual_cutoff: f64) -> Result<Self> {
        log::trace!("Start loading VCF {:?}", path);
        let mut input = open_input_reader(path)?;
        let mut buf = Vec::new();
        let mut header_text = String::new();
        let mut line_number = 0;

        loop {
            if !read_raw_line(&mut input, &mut buf)? {
                return Err(MapGwasError::MissingVcfHeader {
                    path: path.to_path_buf(),
                });
            }
            line_number += 1;
            let line = std::str::from_utf8(&buf)
                .map_err(|_| MapGwasError::parse(path, line_number, "header line is not valid UTF-8"))?;

            if line.starts_with('#') {
                header_text.push_str(line);
                header_text.push('\n');
                if !line.starts_with("##") {
                    break;
                }
            } else if !line.trim().is_empty() {
                return Err(MapGwasError::parse(
                    path,
                    line_number,
                    "data line found before the #CHROM header line",
                ));
            }
        }

        let header: vcf::Header = header_text.parse().map_err(|e| {
            MapGwasError::parse(path, line_number, format!("invalid VCF header: {e}"))
        })?;
        log::debug!(
            "VCF {} header parsed, {} samples",
            path.display(),
            header.sample_names().len()
        );

        Ok(VcfReader {
            path: path.to_path_buf(),
            input,
            header,
            record: vcf::Record::default(),
            buf,
            line_number,
            qual_cutoff,
            stats: VcfStats::default(),
        })
    }

    pub fn stats(&self) -> &VcfStats {
        &self.stats
    }

    pub fn into_stats(self) -> VcfStats {
        self.stats
    }

    fn tally(&mut self, variant: &Variant) {
        *self.stats.type_counts.entry(variant.variant_type()).or_insert(0) += 1;
        if variant.is_filter_pass() {
            self.stats.filter_pass += 1;
        }
    }

    fn skip(&mut self, reason: SkipReason) {
        log::debug!(
            "Skipping VCF line {} in {}: {reason}",
            self.line_number,
            self.path.display()
        );
        self.stats.records_skipped += 1;
    }
}

impl Iterator for VcfReader {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match read_raw_line(&mut self.input, &mut self.buf) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            let parsed = match std::str::from_utf8(&self.buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => parse_record_line(line, &self.header, &mut self.record),
                Err(_) => Err(SkipReason::InvalidUtf8),
            };

            self.stats.records_read += 1;
            match parsed {
                Ok(variant) => {
                    self.tally(&variant);
                    if variant.passes_cutoff(self.qual_cutoff) {
                        self.stats.records_passing += 1;
                        return Some(Ok(variant));
                    }
                    self.stats.records_below_cutoff += 1;
                }
                Err(reason) => self.skip(reason),
            }
        }
    }
}
