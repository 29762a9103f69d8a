use thiserror::Error;

/// Failures surfaced by the conversion core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Nothing in the input looked like a DOI or an arXiv reference
    #[error("invalid identifier format: {input}")]
    InvalidIdentifier { input: String },

    /// doi.org answered 404
    #[error("DOI not found: {identifier}")]
    NotFound { identifier: String },

    /// Any other non-2xx answer
    #[error("server error: {status}")]
    Upstream { status: u16 },

    /// The request did not complete before its deadline
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or TLS failure, or an unreadable body
    #[error("transport error: {0}")]
    Transport(String),

    /// A batch where every fetch failed; carries the first failure
    #[error("{0}")]
    AllFetchesFailed(Box<Error>),
}

impl Error {
    /// Map a ureq failure onto the fetch taxonomy. `identifier` names the thing being fetched so
    /// that a 404 can say what was missing.
    pub(crate) fn from_http(err: ureq::Error, identifier: &str) -> Self {
        match err {
            ureq::Error::StatusCode(404) => Error::NotFound {
                identifier: identifier.to_string(),
            },
            ureq::Error::StatusCode(status) => Error::Upstream { status },
            ureq::Error::Timeout(_) => Error::Timeout,
            ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => Error::Timeout,
            other => Error::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_taxonomy() {
        assert_eq!(
            Error::from_http(ureq::Error::StatusCode(404), "10.1000/x"),
            Error::NotFound {
                identifier: "10.1000/x".into()
            }
        );
        assert_eq!(
            Error::from_http(ureq::Error::StatusCode(503), "10.1000/x"),
            Error::Upstream { status: 503 }
        );
    }

    #[test]
    fn io_timeout_is_a_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert_eq!(Error::from_http(ureq::Error::Io(io), "x"), Error::Timeout);
    }

    #[test]
    fn batch_failure_reads_as_first_cause() {
        let err = Error::AllFetchesFailed(Box::new(Error::Upstream { status: 500 }));
        assert_eq!(err.to_string(), "server error: 500");
    }
}
