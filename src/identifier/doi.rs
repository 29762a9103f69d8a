use once_cell::sync::Lazy;
use regex::Regex;

use crate::identifier::{CanonicalId, IdFamily, Identifier};

/// A DOI found in user input, either inside a doi.org URL or on its own.
pub struct Doi<'a> {
    name: &'a str,
}

// Case-sensitive; the suffix class spells out A-Za-z. Digits and word boundaries are ASCII only.
static DOI_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://)?(?:dx\.)?doi\.org/(10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+)").unwrap()
});
static DOI_ANYWHERE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)(10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+)(?-u:\b)").unwrap()
});

impl<'a> Identifier<'a> for Doi<'a> {
    fn parse(identifier: &'a str) -> Option<Self> {
        let s = identifier.trim();

        let caps = DOI_URL_RE
            .captures(s)
            .or_else(|| DOI_ANYWHERE_RE.captures(s))?;

        Some(Doi {
            name: caps.get(1)?.as_str(),
        })
    }

    fn canonical(&self) -> CanonicalId {
        CanonicalId::new(self.name)
    }
}

impl IdFamily for Doi<'_> {
    type For<'a> = Doi<'a>;
}


#[cfg(test)]
mod tests {
    use super::strategy::doi;
    use super::*;

    fn parse(s: &str) -> Option<Doi<'_>> {
        <Doi<'_> as Identifier<'_>>::parse(s)
    }

    #[test]
    fn parse_finds_generated_doi() {
        proptest::proptest!(|(full in doi())| {
            proptest::prop_assume!(!full.contains("doi.org/"));
            let d = parse(&full).expect("should parse");
            let canonical = d.canonical();
            proptest::prop_assert_eq!(canonical.as_str(), full.as_str());
        })
    }

    #[test]
    fn parse_unwraps_resolver_urls() {
        let hosts = vec![
            "https://doi.org/",
            "http://doi.org/",
            "https://dx.doi.org/",
            "dx.doi.org/",
            "doi.org/",
        ];
        proptest::proptest!(|(full in doi(), host in proptest::sample::select(hosts.clone()))| {
            proptest::prop_assume!(!full.contains("doi.org/"));
            let wrapped = format!("{host}{full}");
            let d = parse(&wrapped).expect("should parse wrapped DOI");
            let canonical = d.canonical();
            proptest::prop_assert_eq!(canonical.as_str(), full.as_str());
        })
    }

    #[test]
    fn parse_finds_doi_in_prose() {
        let d = parse("see 10.1038/nature12373 for details").unwrap();
        assert_eq!(d.canonical().as_str(), "10.1038/nature12373");
        // Trailing sentence punctuation is not part of the DOI.
        let d = parse("(10.1103/PhysRevLett.116.061102).").unwrap();
        assert_eq!(d.canonical().as_str(), "10.1103/PhysRevLett.116.061102");
    }

    #[test]
    fn url_form_wins_over_embedded_form() {
        let d = parse("ref 10.1000/first and https://doi.org/10.1000/second").unwrap();
        assert_eq!(d.canonical().as_str(), "10.1000/second");
    }

    #[test]
    fn parse_rejects_non_doi() {
        proptest::proptest!(|(s in "[A-Za-z0-9 _-]{1,64}")| {
            proptest::prop_assume!(!s.contains("10."));
            proptest::prop_assert!(parse(&s).is_none());
        })
    }

    #[test]
    fn short_registrant_is_rejected() {
        assert!(parse("10.123/abc").is_none());
    }

    #[test]
    fn non_ascii_digits_are_not_a_registrant() {
        assert!(parse("10.١٢٣٤/abc").is_none());
        assert!(parse("10.१२३४/abc").is_none());
    }

    #[test]
    fn doi_after_accented_letter_is_found() {
        let d = parse("é10.1000/abc").unwrap();
        assert_eq!(d.canonical().as_str(), "10.1000/abc");
    }
}
