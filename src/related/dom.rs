use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::identifier::CanonicalId;
use crate::related::{LABEL, accept};

static ANY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("*").unwrap());
static LINK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static DOI_IN_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)doi\.org/(10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+)").unwrap()
});

/// How far up from the label element to look for a link.
const LABEL_ANCESTORS: usize = 5;
/// How far up from a link to look for the label.
const LINK_ANCESTORS: usize = 10;

fn doi_from_href(href: &str) -> Option<&str> {
    DOI_IN_URL
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn has_label(el: &ElementRef<'_>) -> bool {
    el.text().collect::<String>().contains(LABEL)
}

/// Innermost elements carrying the label: their text contains it but no child element's does.
fn label_elements<'a>(doc: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.select(&ANY_SEL).filter(|el| {
        has_label(el) && !el.children().filter_map(ElementRef::wrap).any(|c| has_label(&c))
    })
}

fn first_doi_link(scope: &ElementRef<'_>, arxiv: &CanonicalId) -> Option<CanonicalId> {
    scope
        .select(&LINK_SEL)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(doi_from_href)
        .find_map(|doi| accept(doi, arxiv))
}

/// Start from each element that holds the label: its own links first, then the links of up to
/// five enclosing elements.
pub(super) fn around_label(html: &str, arxiv: &CanonicalId) -> Option<CanonicalId> {
    let doc = Html::parse_document(html);
    label_elements(&doc).find_map(|el| {
        first_doi_link(&el, arxiv).or_else(|| {
            el.ancestors()
                .filter_map(ElementRef::wrap)
                .take(LABEL_ANCESTORS)
                .find_map(|anc| first_doi_link(&anc, arxiv))
        })
    })
}

/// Start from each `doi.org` link: accept it when one of its ten nearest enclosing elements
/// holds the label.
pub(super) fn link_under_label(html: &str, arxiv: &CanonicalId) -> Option<CanonicalId> {
    let doc = Html::parse_document(html);
    doc.select(&LINK_SEL).find_map(|a| {
        let candidate = a
            .value()
            .attr("href")
            .and_then(doi_from_href)
            .and_then(|doi| accept(doi, arxiv))?;
        a.ancestors()
            .filter_map(ElementRef::wrap)
            .take(LINK_ANCESTORS)
            .any(|anc| has_label(&anc))
            .then_some(candidate)
    })
}
