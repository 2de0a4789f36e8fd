use super::atomic_writer::{ensure_output_dir, stage, StagedFile};
use crate::{
    constants::REPORT_FILE_NAME,
    core::{
        config::RunConfig,
        intersect::MatchRecord,
        summary::RunSummary,
        traits::TraitSummary,
        variant::VariantType,
    },
    utils::util::{escape_html, format_number_with_commas, percentage, Result},
};
use std::{fmt::Write as FmtWrite, path::Path};

const STYLE: &str = r#"
body { font-family: "Helvetica Neue", Arial, sans-serif; background: #f7f9fc; color: #333; margin: 40px; line-height: 1.5; }
h1 { background: linear-gradient(to right, #3c79aa, #ff6b6b); color: #fff; padding: 20px; border-radius: 8px; margin: 0 0 20px 0; }
h2 { color: #2d3b71; border-bottom: 3px solid #2d3b71; display: inline-block; padding-bottom: 4px; margin-top: 36px; }
.note { color: #777; font-style: italic; }
.cards { display: flex; flex-wrap: wrap; gap: 16px; }
.card { background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 14px 20px; min-width: 160px; }
.card .value { font-size: 28px; font-weight: bold; color: #2d3b71; }
.card .label { font-size: 14px; color: #576b91; }
.bar-row { display: flex; align-items: center; gap: 12px; margin: 6px 0; }
.bar-label { width: 90px; font-weight: bold; }
.bar-track { flex: 1; background: #e3e6ec; border-radius: 4px; height: 18px; max-width: 600px; }
.bar { height: 18px; border-radius: 4px; }
.bar.snp { background: #ffb854; }
.bar.ins { background: #3d527d; }
.bar.del { background: #ff7f3e; }
.bar.complex { background: #ff9999; }
table { border-collapse: collapse; background: #fff; margin: 12px 0; width: 100%; }
th, td { border: 1px solid #ccd; padding: 4px 8px; text-align: left; font-size: 14px; }
th { background: #eef1f7; cursor: pointer; user-select: none; }
th.asc::after { content: " \25B2"; }
th.desc::after { content: " \25BC"; }
input.filter { padding: 6px 10px; width: 320px; border: 1px solid #ccd; border-radius: 4px; }
"#;

const SCRIPT: &str = r#"
function cellValue(row, index) {
  var cell = row.cells[index];
  var key = cell.getAttribute("data-sort");
  return key !== null ? key : cell.textContent.trim();
}
function sortTable(table, index) {
  var header = table.tHead.rows[0].cells[index];
  var ascending = !header.classList.contains("asc");
  Array.prototype.forEach.call(table.tHead.rows[0].cells, function (th) {
    th.classList.remove("asc", "desc");
  });
  header.classList.add(ascending ? "asc" : "desc");
  var body = table.tBodies[0];
  var rows = Array.prototype.slice.call(body.rows);
  rows.sort(function (a, b) {
    var x = cellValue(a, index), y = cellValue(b, index);
    var nx = parseFloat(x), ny = parseFloat(y);
    var cmp = (!isNaN(nx) && !isNaN(ny)) ? nx - ny : x.localeCompare(y);
    return ascending ? cmp : -cmp;
  });
  rows.forEach(function (row) { body.appendChild(row); });
}
function filterTable(table, text) {
  var needle = text.toLowerCase();
  Array.prototype.forEach.call(table.tBodies[0].rows, function (row) {
    row.style.display = row.textContent.toLowerCase().indexOf(needle) >= 0 ? "" : "none";
  });
}
document.querySelectorAll("table.sortable").forEach(function (table) {
  Array.prototype.forEach.call(table.tHead.rows[0].cells, function (th, index) {
    th.addEventListener("click", function () { sortTable(table, index); });
  });
});
document.querySelectorAll("input.filter").forEach(function (input) {
  var table = document.getElementById(input.getAttribute("data-table"));
  input.addEventListener("input", function () { filterTable(table, input.value); });
});
"#;

fn opt_text(value: Option<&str>) -> String {
    value.map_or_else(String::new, escape_html)
}

fn format_p_value(value: Option<f64>) -> (String, String) {
    match value {
        Some(p) => (format!("{p:.2e}"), format!("{p:e}")),
        None => (String::new(), String::new()),
    }
}

fn format_frequency(value: Option<f64>) -> (String, String) {
    match value {
        Some(f) => (format!("{:.2}%", f * 100.0), format!("{f}")),
        None => (String::new(), String::new()),
    }
}

fn sortable_cell(html: &mut String, display: &str, sort_key: &str) {
    if sort_key.is_empty() {
        let _ = write!(html, "<td>{display}</td>");
    } else {
        let _ = write!(html, "<td data-sort=\"{}\">{display}</td>", escape_html(sort_key));
    }
}

/// Renders the self-contained HTML report.
pub struct HtmlReport<'a> {
    pub config: &'a RunConfig,
    pub summary: &'a RunSummary,
    pub matches: &'a [MatchRecord],
    pub traits: &'a [TraitSummary],
}

impl<'a> HtmlReport<'a> {
    pub fn new(
        config: &'a RunConfig,
        summary: &'a RunSummary,
        matches: &'a [MatchRecord],
        traits: &'a [TraitSummary],
    ) -> Self {
        HtmlReport {
            config,
            summary,
            matches,
            traits,
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(16 * 1024 + self.matches.len() * 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str("<title>GWAS Report</title>\n<style>");
        html.push_str(STYLE);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str("<h1>GWAS Variant Report</h1>\n");
        html.push_str(
            "<p class=\"note\">For research use only. Associations are taken from the supplied GWAS catalog and are not a clinical interpretation.</p>\n",
        );

        self.render_inputs(&mut html);
        self.render_summary(&mut html);
        self.render_variant_types(&mut html);
        self.render_traits(&mut html);
        self.render_matches(&mut html);

        html.push_str("<script>");
        html.push_str(SCRIPT);
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }

    fn render_inputs(&self, html: &mut String) {
        html.push_str("<h2>Inputs</h2>\n<table id=\"inputs\">\n<tbody>\n");
        let rows = [
            ("VCF", escape_html(&self.config.vcf_path.display().to_string())),
            (
                "GWAS catalog",
                escape_html(&self.config.gwas_path.display().to_string()),
            ),
            ("QUAL cutoff", format!("{}", self.config.qual_cutoff)),
            ("Match mode", self.config.match_mode.to_string()),
            (
                "NR traits",
                if self.config.keep_nr { "kept" } else { "removed" }.to_string(),
            ),
        ];
        for (label, value) in rows {
            let _ = writeln!(html, "<tr><th>{label}</th><td>{value}</td></tr>");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    fn render_summary(&self, html: &mut String) {
        let s = self.summary;
        html.push_str("<h2>Summary</h2>\n<div class=\"cards\" id=\"summary\">\n");
        let cards = [
            ("variants-read", "Variants read", s.variants_read()),
            (
                "variants-passing-cutoff",
                "Variants passing cutoff",
                s.variants_passing_cutoff(),
            ),
            ("matches-found", "Matches found", s.matches_found),
            ("associations-found", "Associations", s.associations_found),
            ("traits-found", "Traits", self.traits.len()),
            ("variants-skipped", "Malformed records skipped", s.vcf.records_skipped),
            ("filter-pass", "FILTER=PASS records", s.vcf.filter_pass),
            (
                "catalog-entries",
                "Catalog associations loaded",
                s.catalog.entries_loaded,
            ),
            ("catalog-skipped", "Catalog rows skipped", s.catalog.rows_skipped),
        ];
        for (id, label, value) in cards {
            let _ = writeln!(
                html,
                "<div class=\"card\" id=\"{id}\" data-value=\"{value}\"><div class=\"value\">{}</div><div class=\"label\">{label}</div></div>",
                format_number_with_commas(value)
            );
        }
        html.push_str("</div>\n");
    }

    fn render_variant_types(&self, html: &mut String) {
        let total = self.summary.variants_well_formed();
        html.push_str("<h2>Variant types</h2>\n<div id=\"variant-types\">\n");
        for variant_type in VariantType::ALL {
            let count = self.summary.type_count(variant_type);
            let share = percentage(count, total);
            let _ = writeln!(
                html,
                "<div class=\"bar-row\"><span class=\"bar-label\">{variant_type}</span><div class=\"bar-track\"><div class=\"bar {}\" style=\"width: {share:.2}%\"></div></div><span>{} ({share:.2}%)</span></div>",
                variant_type.css_class(),
                format_number_with_commas(count),
            );
        }
        html.push_str("</div>\n");
    }

    fn render_traits(&self, html: &mut String) {
        html.push_str("<h2>Traits</h2>\n");
        if self.traits.is_empty() {
            html.push_str("<p>No catalog associations matched the variants.</p>\n");
            return;
        }
        html.push_str("<p><input class=\"filter\" data-table=\"traits\" placeholder=\"Filter traits\"></p>\n");
        html.push_str("<table class=\"sortable\" id=\"traits\">\n<thead><tr><th>Trait</th><th>Variants</th><th>Associations</th><th>Max risk allele frequency</th><th>Min p-value</th><th>Mapped gene</th><th>Region</th><th>SNPs</th><th>Group</th></tr></thead>\n<tbody>\n");
        for t in self.traits {
            html.push_str("<tr>");
            let name = match t.trait_description.as_deref() {
                Some(description) => format!(
                    "<span title=\"{}\">{}</span>",
                    escape_html(description),
                    escape_html(&t.trait_name)
                ),
                None => escape_html(&t.trait_name),
            };
            let _ = write!(html, "<td>{name}</td><td>{}</td><td>{}</td>", t.variants, t.associations);
            let (freq, freq_key) = format_frequency(t.max_risk_allele_frequency);
            sortable_cell(html, &freq, &freq_key);
            let (p, p_key) = format_p_value(t.min_p_value);
            sortable_cell(html, &p, &p_key);
            let _ = write!(
                html,
                "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                opt_text(t.gene.as_deref()),
                opt_text(t.region.as_deref()),
                opt_text(t.snps.as_deref()),
                opt_text(t.trait_group.as_deref()),
            );
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    fn render_matches(&self, html: &mut String) {
        html.push_str("<h2>Matched variants</h2>\n");
        if self.matches.is_empty() {
            html.push_str("<p id=\"no-matches\">No variants matched the GWAS catalog.</p>\n");
            return;
        }
        html.push_str("<p><input class=\"filter\" data-table=\"matches\" placeholder=\"Filter matches\"></p>\n");
        html.push_str("<table class=\"sortable\" id=\"matches\">\n<thead><tr><th>Chrom</th><th>Pos</th><th>ID</th><th>Ref</th><th>Alt</th><th>Qual</th><th>Filter</th><th>Type</th><th>Trait</th><th>p-value</th><th>Mapped gene</th><th>SNPs</th><th>Risk allele</th><th>Risk allele frequency</th></tr></thead>\n<tbody>\n");
        for record in self.matches {
            let v = &record.variant;
            let qual = v.quality.map_or_else(String::new, |q| format!("{q}"));
            for entry in &record.catalog_entries {
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{qual}</td><td>{}</td><td>{}</td><td>{}</td>",
                    escape_html(&v.chromosome),
                    v.position,
                    opt_text(v.id.as_deref()),
                    escape_html(&v.ref_allele),
                    escape_html(&v.alt_display()),
                    escape_html(&v.filter_status),
                    v.variant_type(),
                    escape_html(&entry.trait_name),
                );
                let (p, p_key) = format_p_value(entry.p_value);
                sortable_cell(html, &p, &p_key);
                let _ = write!(
                    html,
                    "<td>{}</td><td>{}</td><td>{}</td>",
                    opt_text(entry.gene.as_deref()),
                    opt_text(entry.snps.as_deref()),
                    opt_text(entry.risk_allele.as_deref()),
                );
                let (freq, freq_key) = format_frequency(entry.risk_allele_frequency);
                sortable_cell(html, &freq, &freq_key);
                html.push_str("</tr>\n");
            }
        }
        html.push_str("</tbody>\n</table>\n");
    }
}

/// Renders the report into a staged file in `output_dir`, creating the directory if needed.
pub fn stage_report(
    output_dir: &Path,
    config: &RunConfig,
    summary: &RunSummary,
    matches: &[MatchRecord],
    traits: &[TraitSummary],
) -> Result<StagedFile> {
    ensure_output_dir(output_dir)?;
    let html = HtmlReport::new(config, summary, matches, traits).render();
    stage(&output_dir.join(REPORT_FILE_NAME), |out| {
        out.write_all(html.as_bytes())?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{catalog::CatalogEntry, traits::summarize_traits, variant::test_utils::variant};
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> (RunConfig, RunSummary, Vec<MatchRecord>) {
        let config = RunConfig::new("in.vcf", "gwas.tsv", "out", 50.0);
        let mut summary = RunSummary::new();
        summary.vcf.records_read = 2;
        summary.vcf.records_passing = 1;
        summary.vcf.type_counts.insert(VariantType::Snp, 2);
        summary.matches_found = 1;
        summary.associations_found = 1;
        let mut entry = CatalogEntry::new("1", 100, "<T1>");
        entry.p_value = Some(2e-8);
        entry.risk_allele_frequency = Some(0.25);
        let matches = vec![MatchRecord {
            variant: variant("chr1", 100, "A", &["G"], Some(80.0)),
            catalog_entries: vec![entry],
        }];
        (config, summary, matches)
    }

    #[test]
    fn test_render_contains_counts_and_rows() {
        let (config, summary, matches) = sample();
        let traits = summarize_traits(&matches);
        let html = HtmlReport::new(&config, &summary, &matches, &traits).render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("id=\"variants-read\" data-value=\"2\""));
        assert!(html.contains("id=\"variants-passing-cutoff\" data-value=\"1\""));
        assert!(html.contains("id=\"matches-found\" data-value=\"1\""));
        assert!(html.contains("&lt;T1&gt;"));
        assert!(!html.contains("<T1>"));
        assert!(html.contains("2.00e-8"));
        assert!(html.contains("25.00%"));
        assert!(html.contains("width: 100.00%"));
        assert!(html.contains("table class=\"sortable\" id=\"matches\""));
    }

    #[test]
    fn test_render_without_matches() {
        let (config, _, _) = sample();
        let summary = RunSummary::new();
        let html = HtmlReport::new(&config, &summary, &[], &[]).render();
        assert!(html.contains("id=\"matches-found\" data-value=\"0\""));
        assert!(html.contains("id=\"no-matches\""));
        assert!(html.contains("width: 0.00%"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let (config, summary, matches) = sample();
        let traits = summarize_traits(&matches);
        let first = HtmlReport::new(&config, &summary, &matches, &traits).render();
        let second = HtmlReport::new(&config, &summary, &matches, &traits).render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stage_report_creates_directory() -> Result<()> {
        let (config, summary, matches) = sample();
        let dir = tempdir()?;
        let out = dir.path().join("nested").join("report");
        let traits = summarize_traits(&matches);
        let staged = stage_report(&out, &config, &summary, &matches, &traits)?;
        assert!(!out.join("GWAS_report.html").exists());
        let path = staged.commit()?;
        assert_eq!(path, out.join("GWAS_report.html"));
        assert!(fs::read_to_string(&path)?.contains("GWAS Variant Report"));
        Ok(())
    }
}
