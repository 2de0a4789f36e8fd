use std::{fs, path::Path, process::Command};
use tempfile::tempdir;

const VCF: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\nchr1\t100\t.\tA\tG\t80\tPASS\t.\n";
const CATALOG: &str = "CHR_ID\tCHR_POS\tDISEASE/TRAIT\n1\t100\tT1\n";

fn run(vcf: &Path, gwas: &Path, out: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_mapgwas"))
        .arg("--vcf")
        .arg(vcf)
        .arg("--gwas")
        .arg(gwas)
        .arg("--out")
        .arg(out)
        .args(["--qual-cutoff", "50"])
        .output()
        .expect("binary should start")
}

#[test]
fn cli_success_writes_report() {
    let dir = tempdir().unwrap();
    let (vcf, gwas, out) = (dir.path().join("in.vcf"), dir.path().join("gwas.tsv"), dir.path().join("out"));
    fs::write(&vcf, VCF).unwrap();
    fs::write(&gwas, CATALOG).unwrap();

    let output = run(&vcf, &gwas, &out);
    assert_eq!(output.status.code(), Some(0));
    let html = fs::read_to_string(out.join("GWAS_report.html")).unwrap();
    assert!(html.contains("id=\"matches-found\" data-value=\"1\""));
}

#[test]
fn cli_unreadable_catalog_exits_non_zero() {
    let dir = tempdir().unwrap();
    let (vcf, out) = (dir.path().join("in.vcf"), dir.path().join("out"));
    fs::write(&vcf, VCF).unwrap();

    let output = run(&vcf, &dir.path().join("missing.tsv"), &out);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
    assert!(!out.exists());
}

#[test]
fn cli_malformed_vcf_header_exits_with_parse_status() {
    let dir = tempdir().unwrap();
    let (vcf, gwas, out) = (dir.path().join("in.vcf"), dir.path().join("gwas.tsv"), dir.path().join("out"));
    fs::write(&vcf, "##fileformat=VCFv4.2\n#CHROM\tPOS\n").unwrap();
    fs::write(&gwas, CATALOG).unwrap();

    let output = run(&vcf, &gwas, &out);
    assert_eq!(output.status.code(), Some(2));
    assert!(!out.exists());
}
