use thiserror::Error;

/// Faults raised by the crawl and merge stages.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Two records share a name but disagree on difficulty.
    #[error(
        "difficulty conflict for {name:?}: catalog has {existing:?}, \
         incoming record has {incoming:?}"
    )]
    DifficultyConflict {
        name: String,
        existing: String,
        incoming: String,
    },

    /// A structure the crawler cannot do without is missing from the page.
    #[error("page shape changed at {url}: {what}")]
    ShapeDrift { url: String, what: String },

    #[error("page session failed for {url}: {message}")]
    Session { url: String, message: String },

    #[error("{backend} backend cannot {action}")]
    Unsupported {
        backend: &'static str,
        action: &'static str,
    },
}

impl CrawlError {
    pub fn shape(url: &str, what: impl Into<String>) -> Self {
        CrawlError::ShapeDrift {
            url: url.to_string(),
            what: what.into(),
        }
    }

    pub fn session(url: &str, message: impl ToString) -> Self {
        CrawlError::Session {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Data-correctness fault, as opposed to an external-dependency fault.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(self, CrawlError::DifficultyConflict { .. })
    }
}
