use std::time::Duration;

pub const DEFAULT_BIBTEX_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HTML_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; doi2bib/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Where the metadata page of an arXiv preprint can be retrieved from, tried in order.
/// `{id}` is replaced with the bare arXiv id.
pub const DEFAULT_HTML_ROUTES: &[&str] = &[
    "https://arxiv.org/abs/{id}",
    "https://export.arxiv.org/abs/{id}",
    "https://doi.org/10.48550/arXiv.{id}",
];

/// Network settings for the fetch collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deadline for one BibTeX request to doi.org
    pub bibtex_timeout: Duration,
    /// Deadline for one HTML metadata request, per route
    pub html_timeout: Duration,
    pub user_agent: String,
    /// URL templates for the arXiv metadata page, see [`DEFAULT_HTML_ROUTES`]
    pub html_routes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bibtex_timeout: DEFAULT_BIBTEX_TIMEOUT,
            html_timeout: DEFAULT_HTML_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            html_routes: DEFAULT_HTML_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl Config {
    /// Concrete route URLs for one arXiv id.
    pub fn routes_for(&self, arxiv_id: &str) -> Vec<String> {
        self.html_routes
            .iter()
            .map(|template| template.replace("{id}", arxiv_id))
            .collect()
    }
}
