use super::variant::VariantType;
use std::collections::BTreeMap;

/// Counters of the VCF reading stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcfStats {
    pub records_read: usize,
    pub records_skipped: usize,
    pub records_below_cutoff: usize,
    pub records_passing: usize,
    pub filter_pass: usize,
    pub type_counts: BTreeMap<VariantType, usize>,
}

/// Counters of the catalog loading stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub rows_nr_filtered: usize,
    pub entries_loaded: usize,
    pub coordinates: usize,
}

/// Run-level counters threaded through every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub vcf: VcfStats,
    pub catalog: CatalogStats,
    pub matches_found: usize,
    pub associations_found: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variants_read(&self) -> usize {
        self.vcf.records_read
    }

    pub fn variants_passing_cutoff(&self) -> usize {
        self.vcf.records_passing
    }

    /// Variants with a well-formed record, the denominator of the type breakdown.
    pub fn variants_well_formed(&self) -> usize {
        self.vcf.type_counts.values().sum()
    }

    pub fn type_count(&self, variant_type: VariantType) -> usize {
        self.vcf.type_counts.get(&variant_type).copied().unwrap_or(0)
    }

    pub fn log_summary(&self) {
        log::info!(
            "VCF: {} read, {} passing cutoff, {} below cutoff, {} malformed, {} FILTER=PASS",
            self.vcf.records_read,
            self.vcf.records_passing,
            self.vcf.records_below_cutoff,
            self.vcf.records_skipped,
            self.vcf.filter_pass
        );
        log::info!(
            "Catalog: {} rows read, {} entries loaded at {} coordinates, {} skipped, {} NR filtered",
            self.catalog.rows_read,
            self.catalog.entries_loaded,
            self.catalog.coordinates,
            self.catalog.rows_skipped,
            self.catalog.rows_nr_filtered
        );
        log::info!(
            "Matches: {} variants with {} associations",
            self.matches_found,
            self.associations_found
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_counts() {
        let mut summary = RunSummary::new();
        summary.vcf.type_counts.insert(VariantType::Snp, 3);
        summary.vcf.type_counts.insert(VariantType::Deletion, 1);
        assert_eq!(summary.variants_well_formed(), 4);
        assert_eq!(summary.type_count(VariantType::Snp), 3);
        assert_eq!(summary.type_count(VariantType::Insertion), 0);
    }
}
