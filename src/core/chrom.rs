use std::borrow::Cow;

/// Canonical chromosome name used as the lookup key on both sides of the join.
///
/// Strips an optional `chr` prefix (any case), a trailing float suffix such as
/// `1.0`, upper-cases the remainder and maps `M` to `MT`.
pub fn normalize_chrom(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    let stripped = match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") && trimmed.len() > 3 => &trimmed[3..],
        _ => trimmed,
    };
    let stripped = match stripped.strip_suffix(".0") {
        Some(base) if !base.is_empty() && base.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => stripped,
    };

    if stripped.eq_ignore_ascii_case("m") {
        return Cow::Borrowed("MT");
    }
    if stripped.bytes().any(|b| b.is_ascii_lowercase()) {
        return Cow::Owned(stripped.to_ascii_uppercase());
    }
    Cow::Borrowed(stripped)
}
