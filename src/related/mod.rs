//! Discovery of the published version of an arXiv preprint.
//!
//! arXiv abstract pages carry a "Related DOI" entry pointing at the journal article once the
//! authors report it. The markup around that entry has changed over the years, so the lookup is
//! a chain of heuristics ordered from most to least specific. Each one is a pure function of the
//! page; the first one that yields an identifier wins.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::HtmlFetcher;
use crate::identifier::CanonicalId;

mod dom;
mod pattern;

/// Text that introduces the related DOI on a metadata page.
pub const LABEL: &str = "Related DOI";

/// One heuristic: page HTML and the preprint's identifier in, related identifier out.
pub type Strategy = fn(&str, &CanonicalId) -> Option<CanonicalId>;

/// List of heuristics to iterate over, most precise first.
static STRATEGIES: &[(&str, Strategy)] = &[
    ("label-pattern", pattern::after_label),
    ("label-element", dom::around_label),
    ("link-ancestry", dom::link_under_label),
];

/// Outcome of looking for a related identifier during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedLookup {
    Found(CanonicalId),
    /// The page was retrieved but links to nothing else
    NotFound,
    /// Every retrieval route failed
    Unavailable(Error),
}

/// Run every strategy over `html` in order.
pub fn find_in_html(html: &str, arxiv: &CanonicalId) -> Option<CanonicalId> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(html, arxiv);
        if let Some(id) = &found {
            debug!(strategy = *name, related = %id, "related identifier found");
        }
        found
    })
}

/// Fetch the metadata page of `arxiv` through the configured routes and look for a related
/// identifier. `Ok(None)` means the page had none; `Err` means no route produced a page.
#[instrument(skip(fetcher, config), fields(arxiv = %arxiv))]
pub fn resolve_related<F: HtmlFetcher + ?Sized>(
    arxiv: &CanonicalId,
    fetcher: &F,
    config: &Config,
) -> Result<Option<CanonicalId>> {
    let Some(id) = arxiv.arxiv_id() else {
        return Ok(None);
    };
    let html = fetcher.fetch_html_via(&config.routes_for(id))?;
    Ok(find_in_html(&html, arxiv))
}

static DOI_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+$").unwrap());

/// Vet a DOI scraped from the page: it must look like a DOI and point somewhere other than
/// arXiv itself.
pub(crate) fn accept(candidate: &str, arxiv: &CanonicalId) -> Option<CanonicalId> {
    let candidate = candidate.trim_end_matches(['.', ',', ';', ':']);
    if !DOI_SHAPE_RE.is_match(candidate) {
        return None;
    }
    if candidate.to_ascii_lowercase().starts_with("10.48550/arxiv.")
        || candidate.eq_ignore_ascii_case(arxiv.as_str())
    {
        return None;
    }
    Some(CanonicalId::new(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprint() -> CanonicalId {
        CanonicalId::from_arxiv("2512.06991")
    }

    struct Pages(Vec<Result<String>>);

    impl HtmlFetcher for Pages {
        fn fetch_html(&self, url: &str) -> Result<String> {
            let idx = Config::default()
                .routes_for("2512.06991")
                .iter()
                .position(|r| r == url)
                .expect("unexpected route");
            self.0[idx].clone()
        }
    }

    #[test]
    fn accept_filters_arxiv_and_self() {
        let arxiv = preprint();
        assert!(accept("10.48550/arXiv.2512.06991", &arxiv).is_none());
        assert!(accept("10.48550/ARXIV.2401.00001", &arxiv).is_none());
        assert!(accept("not-a-doi", &arxiv).is_none());
        assert!(accept("10.١٢٣٤/abc", &arxiv).is_none());
        assert_eq!(
            accept("10.1038/s41586-021-03819-2.", &arxiv).map(|id| id.to_string()),
            Some("10.1038/s41586-021-03819-2".to_string())
        );
    }

    #[test]
    fn page_without_label_has_no_related_identifier() {
        let html = r#"<html><body><a href="https://doi.org/10.1000/xyz">x</a></body></html>"#;
        assert_eq!(find_in_html(html, &preprint()), None);
        assert_eq!(find_in_html("", &preprint()), None);
        assert_eq!(find_in_html("<<<>>> not html", &preprint()), None);
    }

    #[test]
    fn resolve_uses_second_route_when_first_fails() {
        let page = format!(
            r#"<td class="tablecell label">{LABEL}:</td><td><a href="https://doi.org/10.1103/PhysRevD.1.1">link</a></td>"#
        );
        let pages = Pages(vec![Err(Error::Timeout), Ok(page), Err(Error::Timeout)]);
        let found = resolve_related(&preprint(), &pages, &Config::default()).unwrap();
        assert_eq!(found.map(|id| id.to_string()).as_deref(), Some("10.1103/PhysRevD.1.1"));
    }

    #[test]
    fn resolve_reports_unavailable_pages() {
        let pages = Pages(vec![
            Err(Error::Upstream { status: 403 }),
            Err(Error::Timeout),
            Err(Error::Upstream { status: 502 }),
        ]);
        let err = resolve_related(&preprint(), &pages, &Config::default()).unwrap_err();
        assert_eq!(err, Error::Upstream { status: 502 });
    }

    #[test]
    fn resolve_ignores_plain_dois() {
        let pages = Pages(vec![]);
        let plain = CanonicalId::new("10.1000/xyz");
        assert_eq!(resolve_related(&plain, &pages, &Config::default()), Ok(None));
    }
}
