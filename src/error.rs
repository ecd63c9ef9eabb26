use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, non-2xx or unreadable response
    Transport,
    /// The server answered with an explicit error payload
    Application,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {}", .0.as_u16())]
    HttpStatus(StatusCode),

    #[error("{0}")]
    Application(String),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Application(_) => ErrorKind::Application,
            FetchError::Transport(_) | FetchError::HttpStatus(_) | FetchError::Decode(_) => {
                ErrorKind::Transport
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to start refresh runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(FetchError::Application("timeout".into()).to_string(), "timeout");
        assert_eq!(
            FetchError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "HTTP error: 500"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(FetchError::Application("x".into()).kind(), ErrorKind::Application);
        assert_eq!(FetchError::HttpStatus(StatusCode::BAD_GATEWAY).kind(), ErrorKind::Transport);
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(FetchError::from(decode).kind(), ErrorKind::Transport);
    }
}
