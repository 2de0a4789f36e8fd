use super::atomic_writer::{ensure_output_dir, stage, StagedFile};
use crate::{
    constants::{MATCHES_TABLE_NAME, TABLE_DIR_NAME, TRAIT_TABLE_NAME},
    core::{intersect::MatchRecord, traits::TraitSummary},
    utils::util::Result,
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    #[serde(rename = "CHROM")]
    chromosome: &'a str,
    #[serde(rename = "POS")]
    position: u64,
    #[serde(rename = "ID")]
    id: Option<&'a str>,
    #[serde(rename = "REF")]
    ref_allele: &'a str,
    #[serde(rename = "ALT")]
    alt_alleles: String,
    #[serde(rename = "QUAL")]
    quality: Option<f64>,
    #[serde(rename = "FILTER")]
    filter_status: &'a str,
    #[serde(rename = "TYPE")]
    variant_type: String,
    #[serde(rename = "DISEASE/TRAIT")]
    trait_name: &'a str,
    #[serde(rename = "P-VALUE")]
    p_value: Option<f64>,
    #[serde(rename = "MAPPED_GENE")]
    gene: Option<&'a str>,
    #[serde(rename = "SNPS")]
    snps: Option<&'a str>,
    #[serde(rename = "REGION")]
    region: Option<&'a str>,
    #[serde(rename = "RISK_ALLELE")]
    risk_allele: Option<&'a str>,
    #[serde(rename = "RISK ALLELE FREQUENCY")]
    risk_allele_frequency: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TraitRow<'a> {
    #[serde(rename = "DISEASE/TRAIT")]
    trait_name: &'a str,
    #[serde(rename = "VARIANTS")]
    variants: usize,
    #[serde(rename = "ASSOCIATIONS")]
    associations: usize,
    #[serde(rename = "RISK ALLELE FREQUENCY")]
    max_risk_allele_frequency: Option<f64>,
    #[serde(rename = "P-VALUE")]
    min_p_value: Option<f64>,
    #[serde(rename = "MAPPED_GENE")]
    gene: Option<&'a str>,
    #[serde(rename = "REGION")]
    region: Option<&'a str>,
    #[serde(rename = "SNPS")]
    snps: Option<&'a str>,
    #[serde(rename = "GROUP")]
    trait_group: Option<&'a str>,
}

fn match_rows(matches: &[MatchRecord]) -> impl Iterator<Item = MatchRow<'_>> {
    matches.iter().flat_map(|record| {
        let variant = &record.variant;
        record.catalog_entries.iter().map(move |entry| MatchRow {
            chromosome: &variant.chromosome,
            position: variant.position,
            id: variant.id.as_deref(),
            ref_allele: &variant.ref_allele,
            alt_alleles: variant.alt_display(),
            quality: variant.quality,
            filter_status: &variant.filter_status,
            variant_type: variant.variant_type().to_string(),
            trait_name: &entry.trait_name,
            p_value: entry.p_value,
            gene: entry.gene.as_deref(),
            snps: entry.snps.as_deref(),
            region: entry.region.as_deref(),
            risk_allele: entry.risk_allele.as_deref(),
            risk_allele_frequency: entry.risk_allele_frequency,
        })
    })
}

fn trait_rows(traits: &[TraitSummary]) -> impl Iterator<Item = TraitRow<'_>> {
    traits.iter().map(|t| TraitRow {
        trait_name: &t.trait_name,
        variants: t.variants,
        associations: t.associations,
        max_risk_allele_frequency: t.max_risk_allele_frequency,
        min_p_value: t.min_p_value,
        gene: t.gene.as_deref(),
        region: t.region.as_deref(),
        snps: t.snps.as_deref(),
        trait_group: t.trait_group.as_deref(),
    })
}

fn stage_csv<T: Serialize>(target: &Path, rows: impl Iterator<Item = T>) -> Result<StagedFile> {
    stage(target, |out| {
        let mut writer = csv::Writer::from_writer(out);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Renders the match and trait tables without moving them into place yet.
pub fn stage_tables(
    output_dir: &Path,
    matches: &[MatchRecord],
    traits: &[TraitSummary],
) -> Result<Vec<StagedFile>> {
    let table_dir = output_dir.join(TABLE_DIR_NAME);
    ensure_output_dir(&table_dir)?;
    Ok(vec![
        stage_csv(&table_dir.join(MATCHES_TABLE_NAME), match_rows(matches))?,
        stage_csv(&table_dir.join(TRAIT_TABLE_NAME), trait_rows(traits))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::atomic_writer::commit_all;
    use crate::core::{catalog::CatalogEntry, traits::summarize_traits, variant::test_utils::variant};
    use std::fs;
    use tempfile::tempdir;

    fn sample_matches() -> Vec<MatchRecord> {
        let mut t1 = CatalogEntry::new("1", 100, "T1");
        t1.p_value = Some(2e-8);
        t1.gene = Some("GENE1".to_string());
        let t2 = CatalogEntry::new("1", 100, "Trait, with comma");
        vec![MatchRecord {
            variant: variant("chr1", 100, "A", &["G"], Some(80.0)),
            catalog_entries: vec![t1, t2],
        }]
    }

    #[test]
    fn test_write_tables() -> Result<()> {
        let dir = tempdir()?;
        let matches = sample_matches();
        let traits = summarize_traits(&matches);
        let paths = commit_all(stage_tables(dir.path(), &matches, &traits)?)?;
        assert_eq!(paths.len(), 2);

        let matches_csv = fs::read_to_string(dir.path().join("data").join("matches.csv"))?;
        let lines: Vec<&str> = matches_csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CHROM,POS,ID,REF,ALT,QUAL,FILTER,TYPE,DISEASE/TRAIT"));
        assert!(lines[1].starts_with("chr1,100,,A,G,80.0,PASS,SNP,T1,"));
        assert!(lines[1].contains("GENE1"));
        assert!(lines[2].contains("\"Trait, with comma\""));

        let traits_csv = fs::read_to_string(dir.path().join("data").join("trait_summary.csv"))?;
        assert_eq!(traits_csv.lines().count(), 3);
        Ok(())
    }

    #[test]
    fn test_write_tables_empty_has_header_only() -> Result<()> {
        let dir = tempdir()?;
        commit_all(stage_tables(dir.path(), &[], &[])?)?;
        let matches_csv = fs::read_to_string(dir.path().join("data").join("matches.csv"))?;
        assert!(matches_csv.is_empty() || matches_csv.lines().count() <= 1);
        Ok(())
    }
}
