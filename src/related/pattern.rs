use once_cell::sync::Lazy;
use regex::Regex;

use crate::identifier::CanonicalId;
use crate::related::accept;

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Related DOI").unwrap());
static DOI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:dx\.)?doi\.org/(10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+)").unwrap()
});

/// Shape of the markup that may sit between the label and the link, and how far past it a
/// `doi.org` link may start.
struct Window {
    lead: Lazy<Regex>,
    reach: usize,
}

static WINDOWS: [Window; 4] = [
    // Link right after the label, with only a colon or tags in between.
    Window {
        lead: Lazy::new(|| {
            Regex::new(r#"(?i)^[\s:]*(?:<[^>]*>[\s:]*)*?(?:<a\b[^>]*?\bhref\s*=\s*["']?)?https?://"#)
                .unwrap()
        }),
        reach: 0,
    },
    // A link a few words further on.
    Window {
        lead: Lazy::new(|| Regex::new(r"^").unwrap()),
        reach: 50,
    },
    // The next table cell.
    Window {
        lead: Lazy::new(|| Regex::new(r"(?is)^.{0,100}?</t[dh]>\s*<td\b[^>]*>").unwrap()),
        reach: 200,
    },
    // Anywhere in the surrounding block, e.g. next to the journal reference.
    Window {
        lead: Lazy::new(|| Regex::new(r"^").unwrap()),
        reach: 200,
    },
];

/// Regex pass over the raw page: for each label occurrence, look for a `doi.org` link in
/// progressively wider windows after it.
pub(super) fn after_label(html: &str, arxiv: &CanonicalId) -> Option<CanonicalId> {
    WINDOWS.iter().find_map(|window| {
        LABEL_RE
            .find_iter(html)
            .find_map(|label| within(&html[label.end()..], window, arxiv))
    })
}

fn within(rest: &str, window: &Window, arxiv: &CanonicalId) -> Option<CanonicalId> {
    let lead = window.lead.find(rest)?;
    let tail = &rest[lead.end()..];
    DOI_LINK_RE
        .captures_iter(tail)
        .take_while(|c| c.get(0).is_some_and(|m| m.start() <= window.reach))
        .find_map(|c| c.get(1).and_then(|m| accept(m.as_str(), arxiv)))
}
