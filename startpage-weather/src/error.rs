use thiserror::Error;

/// Failures of a single weather lookup.
///
/// Each kind is fatal to the call that produced it. Nothing is retried and
/// no fallback values are substituted.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoding service returned no candidates for the name.
    #[error("City not found: {city}")]
    NotFound { city: String },

    /// Transport-level failure: timeout, connection error or non-2xx status.
    #[error("{context}: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body is not the expected structure.
    #[error("Invalid API response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn not_found(city: impl Into<String>) -> Self {
        Self::NotFound { city: city.into() }
    }

    pub fn network(context: &'static str, source: reqwest::Error) -> Self {
        Self::Network { context, source }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    /// True when the request was abandoned because the client timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source, .. } if source.is_timeout())
    }
}
