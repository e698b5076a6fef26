pub mod access;
pub mod ayrshare;
pub mod openai;
pub mod resend;

use thiserror::Error;

use crate::utils::response::APIError;

/// Failure talking to an upstream provider. `Api` keeps the provider's raw
/// response body so the handler can surface exactly what was refused.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected {provider} response: {detail}")]
    Malformed {
        provider: &'static str,
        detail: String,
    },
}

impl ProviderError {
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }
}

impl From<ProviderError> for APIError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api { status, body, .. } => APIError::Provider { status, body },
            other => APIError::InternalServerError(other.to_string()),
        }
    }
}

/// Read an error response without discarding the body; most providers put
/// the useful message there, not in the status line.
pub(crate) async fn reject(
    provider: &'static str,
    response: reqwest::Response,
) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Api {
        provider,
        status,
        body,
    }
}
