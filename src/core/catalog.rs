use super::chrom::normalize_chrom;
use crate::constants::UNKNOWN_RISK_ALLELE;
use std::collections::HashMap;

/// One association row of the GWAS catalog at a single coordinate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogEntry {
    pub chromosome: String,
    pub position: u64,
    pub trait_name: String,
    pub p_value: Option<f64>,
    pub gene: Option<String>,
    pub snps: Option<String>,
    pub region: Option<String>,
    pub risk_allele: Option<String>,
    pub risk_allele_frequency: Option<f64>,
    pub trait_group: Option<String>,
    pub trait_uri: Option<String>,
    pub trait_description: Option<String>,
}

impl CatalogEntry {
    pub fn new(chromosome: impl Into<String>, position: u64, trait_name: impl Into<String>) -> Self {
        CatalogEntry {
            chromosome: chromosome.into(),
            position,
            trait_name: trait_name.into(),
            ..Default::default()
        }
    }

    /// Risk allele when it is actually reported (`?` means unknown).
    pub fn known_risk_allele(&self) -> Option<&str> {
        self.risk_allele
            .as_deref()
            .filter(|allele| !allele.is_empty() && *allele != UNKNOWN_RISK_ALLELE)
    }
}

/// Extracts the allele from a `STRONGEST SNP-RISK ALLELE` value such as `rs123-A`.
pub fn parse_risk_allele(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let allele = match value.rsplit_once('-') {
        Some((_, allele)) => allele.trim(),
        None => value,
    };
    if allele.is_empty() {
        None
    } else {
        Some(allele.to_string())
    }
}

type CoordKey = (String, u64);

/// Coordinate lookup over catalog entries, keyed by normalized chromosome.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    entries: HashMap<CoordKey, Vec<CatalogEntry>>,
    n_entries: usize,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries at an existing coordinate are appended, never replaced.
    pub fn insert(&mut self, entry: CatalogEntry) {
        let key = (normalize_chrom(&entry.chromosome).into_owned(), entry.position);
        self.entries.entry(key).or_default().push(entry);
        self.n_entries += 1;
    }

    pub fn lookup(&self, chromosome: &str, position: u64) -> &[CatalogEntry] {
        let key = (normalize_chrom(chromosome).into_owned(), position);
        match self.entries.get(&key) {
            Some(entries) => entries,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.n_entries
    }

    pub fn is_empty(&self) -> bool {
        self.n_entries == 0
    }

    pub fn n_coordinates(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_coordinates_accumulate() {
        let mut index = CatalogIndex::new();
        index.insert(CatalogEntry::new("1", 100, "T1"));
        index.insert(CatalogEntry::new("chr1", 100, "T2"));
        index.insert(CatalogEntry::new("1", 200, "T3"));

        assert_eq!(index.len(), 3);
        assert_eq!(index.n_coordinates(), 2);
        let hits: Vec<&str> = index
            .lookup("chr1", 100)
            .iter()
            .map(|e| e.trait_name.as_str())
            .collect();
        assert_eq!(hits, ["T1", "T2"]);
    }

    #[test]
    fn test_lookup_miss() {
        let mut index = CatalogIndex::new();
        index.insert(CatalogEntry::new("2", 100, "T1"));
        assert!(index.lookup("1", 100).is_empty());
        assert!(index.lookup("2", 101).is_empty());
        assert!(CatalogIndex::new().is_empty());
    }

    #[test]
    fn test_parse_risk_allele() {
        assert_eq!(parse_risk_allele("rs123-A"), Some("A".to_string()));
        assert_eq!(parse_risk_allele("rs123-?"), Some("?".to_string()));
        assert_eq!(parse_risk_allele("chr1:100-TTA"), Some("TTA".to_string()));
        assert_eq!(parse_risk_allele("G"), Some("G".to_string()));
        assert_eq!(parse_risk_allele("rs1-"), None);
        assert_eq!(parse_risk_allele(""), None);
    }

    #[test]
    fn test_known_risk_allele() {
        let mut entry = CatalogEntry::new("1", 1, "T");
        assert_eq!(entry.known_risk_allele(), None);
        entry.risk_allele = Some("?".to_string());
        assert_eq!(entry.known_risk_allele(), None);
        entry.risk_allele = Some("C".to_string());
        assert_eq!(entry.known_risk_allele(), Some("C"));
    }
}
