//! Clean-up and re-keying of raw BibTeX records.
//!
//! Works on the text directly instead of a parsed bibliography: the line-preserving mode has to
//! hand back every untouched byte exactly as the registry served it.

mod beautify;
pub mod key;
mod preserve;

pub use key::citation_key;

/// Toggles applied on every normalization. There are no defaults here; callers pass the
/// current state each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub remove_abstract: bool,
    pub remove_keywords: bool,
    /// Rebuild the entry field by field instead of editing lines in place
    pub beautify: bool,
}

impl FormatOptions {
    fn drops(&self, field: &str) -> bool {
        (self.remove_abstract && field == "abstract")
            || (self.remove_keywords && field == "keywords")
    }
}

/// Re-key and clean one BibTeX record. Never fails: text that cannot be understood comes back
/// as-is.
pub fn normalize(raw: &str, options: &FormatOptions) -> String {
    let key = citation_key(raw);
    if options.beautify {
        beautify::rebuild(raw, key.as_deref(), options)
    } else {
        preserve::edit_lines(raw, key.as_deref(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "@article{foo, author = {Smith, John}, year = {2023}, title = {T}}";

    fn opts(remove_abstract: bool, remove_keywords: bool, beautify: bool) -> FormatOptions {
        FormatOptions {
            remove_abstract,
            remove_keywords,
            beautify,
        }
    }

    #[test]
    fn key_is_regenerated_in_both_modes() {
        let plain = normalize(SAMPLE, &opts(false, false, false));
        assert!(plain.starts_with("@article{Smith2023,"), "{plain}");

        let pretty = normalize(SAMPLE, &opts(false, false, true));
        assert_eq!(
            pretty,
            "@article{Smith2023,\n  author = {Smith, John},\n  year = {2023},\n  title = {T},\n}"
        );
    }

    #[test]
    fn abstract_is_removed_in_both_modes() {
        let raw = "@article{k,\n  title = {A},\n  Abstract = {Long text},\n  year = {2020},\n  author = {Doe, J}\n}";
        for beautify in [false, true] {
            let out = normalize(raw, &opts(true, false, beautify));
            assert!(!out.to_lowercase().contains("abstract"), "{out}");
            let title = out.find("title").unwrap();
            let year = out.find("year").unwrap();
            let author = out.find("author").unwrap();
            assert!(title < year && year < author, "{out}");
        }
    }

    #[test]
    fn keywords_only_go_when_asked() {
        let raw = "@misc{k,\n  keywords = {a, b},\n  abstract = {x}\n}";
        let out = normalize(raw, &opts(false, true, true));
        assert!(!out.contains("keywords"));
        assert!(out.contains("abstract = {x}"));
    }

    #[test]
    fn beautify_is_idempotent_for_balanced_values() {
        let raw = " @inproceedings{ orig ,\n\tauthor={Lovelace, Ada and Babbage, Charles},\n title = {Notes, {with} commas},\n  YEAR = 1843,\n  keywords={x}}";
        let o = opts(false, true, true);
        let once = normalize(raw, &o);
        let twice = normalize(&once, &o);
        assert_eq!(once, twice);
        assert!(once.starts_with("@inproceedings{Lovelace1843,\n"));
        assert!(once.contains("  title = {Notes, {with} commas},\n"));
        assert!(once.contains("  year = 1843,\n"));
    }

    #[test]
    fn unparseable_text_is_returned_unchanged() {
        let raw = "not bibtex at all";
        assert_eq!(normalize(raw, &opts(true, true, true)), raw);
        assert_eq!(normalize(raw, &opts(true, true, false)), raw);
    }

    #[test]
    fn options_can_be_reapplied_to_the_same_raw_record() {
        let raw = "@article{k,\n  author = {Doe, J},\n  year = {2020},\n  abstract = {x}\n}";
        let without = normalize(raw, &opts(true, false, false));
        let with = normalize(raw, &opts(false, false, false));
        assert!(!without.contains("abstract"));
        assert!(with.contains("  abstract = {x}"));
    }

    #[test]
    fn non_ascii_year_keeps_the_original_key() {
        let raw = "@article{foo,\n  author = {Smith, John},\n  year = {२०२३}\n}";
        for beautify in [false, true] {
            let options = FormatOptions {
                remove_abstract: false,
                remove_keywords: false,
                beautify,
            };
            assert!(normalize(raw, &options).starts_with("@article{foo,\n"));
        }
    }
}
