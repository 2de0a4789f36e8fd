use super::{
    catalog::{CatalogEntry, CatalogIndex},
    summary::RunSummary,
    variant::Variant,
};
use crate::utils::util::Result;
use clap::ValueEnum;
use std::fmt;

/// How a variant and a catalog entry at the same coordinate are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MatchMode {
    /// Chromosome and position only
    #[default]
    Position,
    /// Chromosome, position and a known risk allele equal to one of the ALT alleles
    Allele,
}

impl MatchMode {
    pub fn accepts(&self, variant: &Variant, entry: &CatalogEntry) -> bool {
        match self {
            MatchMode::Position => true,
            MatchMode::Allele => entry
                .known_risk_allele()
                .is_some_and(|allele| variant.has_alt_allele(allele)),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Position => write!(f, "position"),
            MatchMode::Allele => write!(f, "allele"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub variant: Variant,
    pub catalog_entries: Vec<CatalogEntry>,
}

pub fn match_variant(
    variant: Variant,
    index: &CatalogIndex,
    mode: MatchMode,
) -> Option<MatchRecord> {
    let catalog_entries: Vec<CatalogEntry> = index
        .lookup(&variant.chromosome, variant.position)
        .iter()
        .filter(|entry| mode.accepts(&variant, entry))
        .cloned()
        .collect();
    if catalog_entries.is_empty() {
        return None;
    }
    Some(MatchRecord {
        variant,
        catalog_entries,
    })
}

/// Joins a variant stream against the index, preserving input order.
///
/// Stops at the first stream error; variants without hits are dropped.
pub fn intersect<I>(
    variants: I,
    index: &CatalogIndex,
    mode: MatchMode,
    summary: &mut RunSummary,
) -> Result<Vec<MatchRecord>>
where
    I: IntoIterator<Item = Result<Variant>>,
{
    let mut matches = Vec::new();
    for variant in variants {
        if let Some(record) = match_variant(variant?, index, mode) {
            log::trace!(
                "Match {}:{} -> {} associations",
                record.variant.chromosome,
                record.variant.position,
                record.catalog_entries.len()
            );
            summary.associations_found += record.catalog_entries.len();
            matches.push(record);
        }
    }
    summary.matches_found = matches.len();
    Ok(matches)
}
