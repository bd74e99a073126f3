//! Display name resolution
//!
//! The backend nests human-readable names under different keys depending on
//! which relation it eager-loaded (`barang.nama_barang`, `bahan.nama_barang`,
//! a flat `nama_barang`, ...). Callers list candidates in precedence order
//! and the first non-blank one wins.

/// Pick the first candidate that is present and not blank, trimmed
///
/// # Example
///
/// ```rust
/// use produksi::model::resolve_display_name;
///
/// let name = resolve_display_name([None, Some("  "), Some("Kain Katun "), Some("ignored")]);
/// assert_eq!(name.as_deref(), Some("Kain Katun"));
/// ```
pub fn resolve_display_name<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_present_candidate_wins() {
        let name = resolve_display_name([Some("Benang"), Some("Kain")]);
        assert_eq!(name.as_deref(), Some("Benang"));
    }

    #[test]
    fn test_blank_candidates_are_skipped() {
        let name = resolve_display_name([Some(""), None, Some("\t"), Some("Kain")]);
        assert_eq!(name.as_deref(), Some("Kain"));
    }

    #[test]
    fn test_no_candidate_resolves_to_none() {
        assert_eq!(resolve_display_name([None, Some(" ")]), None);
        assert_eq!(resolve_display_name(std::iter::empty::<Option<&str>>()), None);
    }
}
