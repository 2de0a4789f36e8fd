use super::intersect::MatchRecord;
use std::{cmp::Ordering, collections::HashMap};

/// Matches aggregated per trait for the report overview.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraitSummary {
    pub trait_name: String,
    pub variants: usize,
    pub associations: usize,
    pub max_risk_allele_frequency: Option<f64>,
    pub min_p_value: Option<f64>,
    pub gene: Option<String>,
    pub region: Option<String>,
    pub snps: Option<String>,
    pub trait_group: Option<String>,
    pub trait_description: Option<String>,
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn first_of(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

/// Orders by descending risk allele frequency (unknown last), then trait name.
fn compare_summaries(a: &TraitSummary, b: &TraitSummary) -> Ordering {
    match (a.max_risk_allele_frequency, b.max_risk_allele_frequency) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.trait_name.cmp(&b.trait_name))
}

pub fn summarize_traits(matches: &[MatchRecord]) -> Vec<TraitSummary> {
    let mut summaries: Vec<TraitSummary> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in matches {
        let mut seen_in_record: Vec<usize> = Vec::new();
        for entry in &record.catalog_entries {
            let slot = *slots.entry(entry.trait_name.as_str()).or_insert_with(|| {
                summaries.push(TraitSummary {
                    trait_name: entry.trait_name.clone(),
                    ..Default::default()
                });
                summaries.len() - 1
            });
            let summary = &mut summaries[slot];
            summary.associations += 1;
            if !seen_in_record.contains(&slot) {
                summary.variants += 1;
                seen_in_record.push(slot);
            }
            summary.max_risk_allele_frequency =
                max_opt(summary.max_risk_allele_frequency, entry.risk_allele_frequency);
            summary.min_p_value = min_opt(summary.min_p_value, entry.p_value);
            first_of(&mut summary.gene, &entry.gene);
            first_of(&mut summary.region, &entry.region);
            first_of(&mut summary.snps, &entry.snps);
            first_of(&mut summary.trait_group, &entry.trait_group);
            first_of(&mut summary.trait_description, &entry.trait_description);
        }
    }

    summaries.sort_by(compare_summaries);
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{catalog::CatalogEntry, variant::test_utils::variant};

    fn entry(trait_name: &str, raf: Option<f64>, p: Option<f64>, gene: Option<&str>) -> CatalogEntry {
        let mut e = CatalogEntry::new("1", 1, trait_name);
        e.risk_allele_frequency = raf;
        e.p_value = p;
        e.gene = gene.map(str::to_string);
        e
    }

    fn record(pos: u64, entries: Vec<CatalogEntry>) -> MatchRecord {
        MatchRecord {
            variant: variant("1", pos, "A", &["G"], Some(50.0)),
            catalog_entries: entries,
        }
    }

    #[test]
    fn test_summarize_traits_aggregates() {
        let matches = vec![
            record(
                1,
                vec![
                    entry("Height", Some(0.2), Some(1e-8), None),
                    entry("Height", Some(0.5), Some(1e-6), Some("G1")),
                ],
            ),
            record(2, vec![entry("Height", None, Some(1e-12), Some("G2"))]),
            record(3, vec![entry("BMI", Some(0.9), None, Some("G3"))]),
        ];
        let summaries = summarize_traits(&matches);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].trait_name, "BMI");
        let height = &summaries[1];
        assert_eq!(height.variants, 2);
        assert_eq!(height.associations, 3);
        assert_eq!(height.max_risk_allele_frequency, Some(0.5));
        assert_eq!(height.min_p_value, Some(1e-12));
        assert_eq!(height.gene.as_deref(), Some("G1"));
    }

    #[test]
    fn test_summarize_traits_ordering() {
        let matches = vec![record(
            1,
            vec![
                entry("Zeta", None, None, None),
                entry("Alpha", None, None, None),
                entry("Mid", Some(0.3), None, None),
                entry("Top", Some(0.3), None, None),
                entry("High", Some(0.8), None, None),
            ],
        )];
        let names: Vec<String> = summarize_traits(&matches)
            .into_iter()
            .map(|s| s.trait_name)
            .collect();
        assert_eq!(names, ["High", "Mid", "Top", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_summarize_traits_empty() {
        assert!(summarize_traits(&[]).is_empty());
    }
}
