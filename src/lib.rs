//! Turn DOIs and arXiv references into clean, consistently keyed BibTeX.
//!
//! The flow is [`identifier::extract_all`] → [`fetch::BibtexFetcher`] →
//! [`bibtex::normalize`], with [`batch::run_batch`] composing the steps and
//! [`related::resolve_related`] adding the published version of a preprint when one is known.

pub mod batch;
pub mod bibtex;
pub mod config;
pub mod error;
pub mod fetch;
pub mod identifier;
pub mod related;

pub use batch::{BatchOptions, BatchState, NormalizedEntry, run_batch};
pub use bibtex::{FormatOptions, normalize};
pub use config::Config;
pub use error::{Error, Result};
pub use identifier::{CanonicalId, extract, extract_all, is_arxiv_derived};
