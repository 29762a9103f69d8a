use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use url::Url;

pub mod arxiv;
pub mod doi;

use self::{arxiv::Arxiv, doi::Doi};

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Registrant prefix DataCite assigns to arXiv preprints.
pub const ARXIV_DOI_PREFIX: &str = "10.48550/arXiv.";

/// Something that can be recognised in user input and turned into a DOI-shaped identifier.
pub trait Identifier<'a>: Sized + 'a {
    fn parse(identifier: &'a str) -> Option<Self>;
    fn canonical(&self) -> CanonicalId;
}

// Use GAT because we don't have higher-kinded types in Rust (sad)
pub trait IdFamily {
    type For<'a>: Identifier<'a>;
}

type ParserFn = for<'a> fn(&'a str) -> Option<CanonicalId>;

/// Get the parser of a given identifier family `F` as a plain fn pointer.
const fn erase<F: IdFamily>() -> ParserFn {
    fn call<'a, G: IdFamily>(s: &'a str) -> Option<CanonicalId> {
        <G::For<'a> as Identifier<'a>>::parse(s).map(|id| id.canonical())
    }

    let f: ParserFn = call::<F>;
    f
}

/// List of parsers to iterate over.
///
/// NOTE: Ordering is important here, as it signifies priority. Every arXiv form is tried before
/// any DOI form, and the first parser that accepts the input wins.
static PARSERS: &[ParserFn] = &[erase::<Arxiv>(), erase::<Doi>()];

/// A DOI string of the form `10.<registrant>/<suffix>`. arXiv references are always stored in
/// their `10.48550/arXiv.<id>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub(crate) fn new(s: impl Into<String>) -> Self {
        CanonicalId(s.into())
    }

    pub fn from_arxiv(id: &str) -> Self {
        CanonicalId(format!("{ARXIV_DOI_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_arxiv_derived(&self) -> bool {
        is_arxiv_derived(&self.0)
    }

    /// The bare arXiv id (`2512.06991`) for arXiv-derived identifiers.
    pub fn arxiv_id(&self) -> Option<&str> {
        self.0.strip_prefix(ARXIV_DOI_PREFIX)
    }

    /// Resolver URL on doi.org.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        let (prefix, suffix) = self.0.split_once('/').unwrap_or((self.0.as_str(), ""));
        let enc_suffix = utf8_percent_encode(suffix, PATH_SEGMENT_ENCODE_SET).to_string();
        Url::parse(&format!("https://doi.org/{prefix}/{enc_suffix}"))
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True iff `id` is a DataCite arXiv DOI.
pub fn is_arxiv_derived(id: &str) -> bool {
    static ARXIV_DERIVED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^10\.48550/arXiv\.").unwrap());
    ARXIV_DERIVED_RE.is_match(id)
}

/// Turn one reference pasted by a user into its canonical identifier.
pub fn extract(text: &str) -> Option<CanonicalId> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    PARSERS.iter().find_map(|f| f(text))
}

/// Extract every comma-separated part of `raw`, skipping the parts that don't parse.
pub fn extract_all(raw: &str) -> Vec<CanonicalId> {
    raw.split(',').filter_map(extract).collect()
}
