//! One conversion run: raw input in, classified BibTeX records out.
//!
//! The run owns nothing global. [`run_batch`] returns a [`BatchState`] that the caller keeps, and
//! every later rendering with different [`FormatOptions`] goes through that value instead of
//! refetching.

use tracing::{debug, info, instrument, warn};

use crate::bibtex::{FormatOptions, normalize};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{BibtexFetcher, HtmlFetcher};
use crate::identifier::{CanonicalId, extract_all};
use crate::related::{RelatedLookup, resolve_related};

/// Where a record is shown. arXiv preprints come first, everything else after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Arxiv,
    Primary,
}

impl Slot {
    pub fn of(identifier: &CanonicalId) -> Self {
        if identifier.is_arxiv_derived() {
            Slot::Arxiv
        } else {
            Slot::Primary
        }
    }
}

/// How an identifier entered the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed or pasted by the user
    Supplied,
    /// Found on the metadata page of a supplied preprint
    Related,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub identifier: CanonicalId,
    pub raw_bibtex: String,
    pub slot: Slot,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub identifier: CanonicalId,
    pub error: Error,
}

/// A record rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub identifier: CanonicalId,
    pub slot: Slot,
    pub origin: Origin,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Look up the published version of preprints supplied on their own
    pub resolve_related: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            resolve_related: true,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchState {
    results: Vec<FetchResult>,
    failures: Vec<Failure>,
    related: Vec<(CanonicalId, RelatedLookup)>,
}

impl BatchState {
    /// Successful fetches, arXiv slot first.
    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    /// Identifiers whose fetch failed, in fetch order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Outcome of each related-identifier lookup, keyed by the preprint it started from.
    pub fn related(&self) -> &[(CanonicalId, RelatedLookup)] {
        &self.related
    }

    /// Normalize every stored record with `options`.
    pub fn render(&self, options: &FormatOptions) -> Vec<NormalizedEntry> {
        self.results
            .iter()
            .map(|r| NormalizedEntry {
                identifier: r.identifier.clone(),
                slot: r.slot,
                origin: r.origin,
                text: normalize(&r.raw_bibtex, options),
            })
            .collect()
    }
}

/// Extract, deduplicate, resolve related identifiers, then fetch each record.
///
/// Fails only when nothing in `raw` is an identifier, or when every fetch failed; a failed fetch
/// otherwise only lands in [`BatchState::failures`].
#[instrument(skip_all, fields(input = %raw))]
pub fn run_batch<B, H>(
    raw: &str,
    bibtex: &B,
    html: &H,
    config: &Config,
    options: &BatchOptions,
) -> Result<BatchState>
where
    B: BibtexFetcher + ?Sized,
    H: HtmlFetcher + ?Sized,
{
    let mut identifiers: Vec<(CanonicalId, Origin)> = Vec::new();
    for id in extract_all(raw) {
        if !identifiers.iter().any(|(seen, _)| *seen == id) {
            identifiers.push((id, Origin::Supplied));
        }
    }
    if identifiers.is_empty() {
        return Err(Error::InvalidIdentifier {
            input: raw.trim().to_string(),
        });
    }
    debug!(count = identifiers.len(), "extracted identifiers");

    let mut state = BatchState::default();

    let only_preprints = identifiers.iter().all(|(id, _)| id.is_arxiv_derived());
    if options.resolve_related && only_preprints {
        let preprints: Vec<CanonicalId> = identifiers.iter().map(|(id, _)| id.clone()).collect();
        for arxiv in preprints {
            let lookup = match resolve_related(&arxiv, html, config) {
                Ok(Some(found)) => RelatedLookup::Found(found),
                Ok(None) => RelatedLookup::NotFound,
                Err(e) => {
                    warn!(%arxiv, error = %e, "metadata page unavailable");
                    RelatedLookup::Unavailable(e)
                }
            };
            if let RelatedLookup::Found(found) = &lookup
                && !identifiers.iter().any(|(seen, _)| seen == found)
            {
                identifiers.push((found.clone(), Origin::Related));
            }
            state.related.push((arxiv, lookup));
        }
    }

    for (identifier, origin) in identifiers {
        match bibtex.fetch_bibtex(&identifier) {
            Ok(raw_bibtex) => {
                debug!(%identifier, bytes = raw_bibtex.len(), "fetched record");
                state.results.push(FetchResult {
                    slot: Slot::of(&identifier),
                    identifier,
                    raw_bibtex,
                    origin,
                });
            }
            Err(error) => {
                debug!(%identifier, %error, "fetch failed");
                state.failures.push(Failure { identifier, error });
            }
        }
    }

    if state.results.is_empty()
        && let Some(first) = state.failures.first()
    {
        return Err(Error::AllFetchesFailed(Box::new(first.error.clone())));
    }

    // Stable, so fetch order survives within a slot.
    state.results.sort_by_key(|r| r.slot);

    info!(
        fetched = state.results.len(),
        failed = state.failures.len(),
        "batch complete"
    );
    Ok(state)
}
