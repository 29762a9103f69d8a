//! Contracts the core needs from the network, and the default ureq-backed implementation.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identifier::CanonicalId;

pub mod http;

pub use http::HttpFetcher;

/// Retrieves the raw BibTeX record registered for an identifier.
pub trait BibtexFetcher {
    /// Must report [`Error::NotFound`] on 404, [`Error::Upstream`] on any other non-2xx and
    /// [`Error::Timeout`] when the deadline passes.
    fn fetch_bibtex(&self, identifier: &CanonicalId) -> Result<String>;
}

/// Retrieves HTML documents.
pub trait HtmlFetcher {
    fn fetch_html(&self, url: &str) -> Result<String>;

    /// Try each route in order and return the first document that arrives. A failed route is
    /// not fatal; when every route fails the last failure is returned.
    fn fetch_html_via(&self, routes: &[String]) -> Result<String> {
        let mut last = Error::Transport("no retrieval route configured".to_string());
        for route in routes {
            match self.fetch_html(route) {
                Ok(html) => {
                    debug!(%route, bytes = html.len(), "fetched metadata page");
                    return Ok(html);
                }
                Err(e) => {
                    warn!(%route, error = %e, "route unavailable, trying next");
                    last = e;
                }
            }
        }
        Err(last)
    }
}
