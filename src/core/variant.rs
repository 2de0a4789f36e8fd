use crate::constants::FILTER_PASS;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariantType {
    Snp,
    Insertion,
    Deletion,
    Complex,
}

impl VariantType {
    pub const ALL: [VariantType; 4] = [
        VariantType::Snp,
        VariantType::Insertion,
        VariantType::Deletion,
        VariantType::Complex,
    ];

    /// Classifies by comparing REF against the first ALT allele.
    pub fn classify(ref_allele: &str, alt_allele: Option<&str>) -> Self {
        let ref_len = ref_allele.len();
        let alt_len = alt_allele.map_or(0, str::len);
        if ref_len == 1 && alt_len == 1 {
            VariantType::Snp
        } else if ref_len < alt_len {
            VariantType::Insertion
        } else if ref_len > alt_len {
            VariantType::Deletion
        } else {
            VariantType::Complex
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            VariantType::Snp => "snp",
            VariantType::Insertion => "ins",
            VariantType::Deletion => "del",
            VariantType::Complex => "complex",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantType::Snp => write!(f, "SNP"),
            VariantType::Insertion => write!(f, "INS"),
            VariantType::Deletion => write!(f, "DEL"),
            VariantType::Complex => write!(f, "COMPLEX"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub chromosome: String,
    pub position: u64,
    pub id: Option<String>,
    pub ref_allele: String,
    pub alt_alleles: Vec<String>,
    pub quality: Option<f64>,
    pub filter_status: String,
}

impl Variant {
    pub fn variant_type(&self) -> VariantType {
        VariantType::classify(
            &self.ref_allele,
            self.alt_alleles.first().map(String::as_str),
        )
    }

    /// Missing QUAL never passes.
    pub fn passes_cutoff(&self, qual_cutoff: f64) -> bool {
        self.quality.is_some_and(|q| q >= qual_cutoff)
    }

    pub fn is_filter_pass(&self) -> bool {
        self.filter_status == FILTER_PASS
    }

    pub fn has_alt_allele(&self, allele: &str) -> bool {
        self.alt_alleles
            .iter()
            .any(|alt| alt.eq_ignore_ascii_case(allele))
    }

    pub fn alt_display(&self) -> String {
        if self.alt_alleles.is_empty() {
            return ".".to_string();
        }
        self.alt_alleles.join(",")
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::Variant;

    pub fn variant(chrom: &str, pos: u64, ref_allele: &str, alts: &[&str], qual: Option<f64>) -> Variant {
        Variant {
            chromosome: chrom.to_string(),
            position: pos,
            id: None,
            ref_allele: ref_allele.to_string(),
            alt_alleles: alts.iter().map(|a| a.to_string()).collect(),
            quality: qual,
            filter_status: "PASS".to_string(),
        }
    }
}
