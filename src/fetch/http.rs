use std::time::Duration;

use tracing::{debug, instrument};
use ureq::Agent;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{BibtexFetcher, HtmlFetcher};
use crate::identifier::CanonicalId;

const ACCEPT_BIBTEX: &str = "application/x-bibtex";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Blocking HTTP client for doi.org content negotiation and arXiv metadata pages.
///
/// Each kind of request has its own agent so that the two deadlines stay independent.
pub struct HttpFetcher {
    bibtex: Agent,
    html: Agent,
    user_agent: String,
}

fn agent_with_timeout(timeout: Duration) -> Agent {
    let cfg = Agent::config_builder()
        .timeout_connect(Some(timeout))
        .timeout_global(Some(timeout))
        .build();
    Agent::new_with_config(cfg)
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        HttpFetcher {
            bibtex: agent_with_timeout(config.bibtex_timeout),
            html: agent_with_timeout(config.html_timeout),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl BibtexFetcher for HttpFetcher {
    #[instrument(skip(self), fields(identifier = %identifier))]
    fn fetch_bibtex(&self, identifier: &CanonicalId) -> Result<String> {
        let url = identifier
            .to_url()
            .map_err(|e| Error::Transport(format!("bad DOI URL: {e}")))?;
        debug!(%url, "requesting BibTeX");
        let body = self
            .bibtex
            .get(url.as_str())
            .header("Accept", ACCEPT_BIBTEX)
            .header("User-Agent", &self.user_agent)
            .call()
            .and_then(|mut res| res.body_mut().read_to_string())
            .map_err(|e| Error::from_http(e, identifier.as_str()))?;
        Ok(body)
    }
}

impl HtmlFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch_html(&self, url: &str) -> Result<String> {
        let body = self
            .html
            .get(url)
            .header("Accept", ACCEPT_HTML)
            .header("User-Agent", &self.user_agent)
            .call()
            .and_then(|mut res| res.body_mut().read_to_string())
            .map_err(|e| match e {
                // A missing page is just another unavailable route here.
                ureq::Error::StatusCode(status) => Error::Upstream { status },
                e => Error::from_http(e, url),
            })?;
        Ok(body)
    }
}
