use once_cell::sync::Lazy;
use regex::Regex;

use crate::identifier::{CanonicalId, IdFamily, Identifier};

/// A new-style arXiv id (`YYMM.NNNNN`) found in user input. Version suffixes are dropped.
pub struct Arxiv<'a> {
    id: &'a str,
}

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?arxiv\.org/(?:abs|pdf)/([0-9]{4}\.[0-9]{4,5})(?:\.pdf)?").unwrap()
});
static SCHEMELESS_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)arxiv\.org/(?:abs|pdf)/([0-9]{4}\.[0-9]{4,5})(?:\.pdf)?").unwrap()
});
static PREFIXED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:arxiv|arXiv):([0-9]{4}\.[0-9]{4,5})").unwrap());
static BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}\.[0-9]{4,5}$").unwrap());

impl<'a> Identifier<'a> for Arxiv<'a> {
    fn parse(identifier: &'a str) -> Option<Self> {
        let s = identifier.trim();

        for re in [&*URL_RE, &*SCHEMELESS_URL_RE, &*PREFIXED_RE] {
            if let Some(m) = re.captures(s).and_then(|c| c.get(1)) {
                return Some(Arxiv { id: m.as_str() });
            }
        }

        // A lone id containing "10." is left to the DOI parser.
        if BARE_RE.is_match(s) && !s.contains("10.") {
            return Some(Arxiv { id: s });
        }

        None
    }

    fn canonical(&self) -> CanonicalId {
        CanonicalId::from_arxiv(self.id)
    }
}

#[cfg(test)]
impl<'a> Arxiv<'a> {
    fn id(&self) -> &'a str {
        self.id
    }
}

impl IdFamily for Arxiv<'_> {
    type For<'a> = Arxiv<'a>;
}
