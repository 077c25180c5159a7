use thiserror::Error;

/// Classification of an extraction failure. Every failure is exactly one
/// kind, and every kind except `Unknown` is safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    RateLimit,
    Timeout,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Server => "server",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Error from the extraction flow, classified for retry decisions.
///
/// The payload keeps the raw technical message for logs; `user_message`
/// is what a screen should show.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited: {0}")]
    RateLimit(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("{0}")]
    Unknown(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Network(_) => ErrorKind::Network,
            ExtractError::RateLimit(_) => ErrorKind::RateLimit,
            ExtractError::Timeout(_) => ErrorKind::Timeout,
            ExtractError::Server(_) => ErrorKind::Server,
            ExtractError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Whether a retry could plausibly succeed. `Unknown` is the only
    /// terminal kind; it aborts the retry loop.
    pub fn retryable(&self) -> bool {
        !matches!(self, ExtractError::Unknown(_))
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractError::Network(_) => "Check your internet connection and try again.",
            ExtractError::RateLimit(_) => "The service is busy right now. Try again in a minute.",
            ExtractError::Timeout(_) => "The request took too long. Try again.",
            ExtractError::Server(_) => "Something went wrong on our end. Try again shortly.",
            ExtractError::Unknown(_) => "Could not extract a recipe from this link.",
        }
    }

    /// Classify an HTTP response by status code.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            // TODO: confirm 401/403 should stay retryable; retrying a bad
            // key burns the whole backoff budget before surfacing.
            401 | 403 => ExtractError::Server(format!("HTTP {}: {}", status, message)),
            429 => ExtractError::RateLimit(format!("HTTP {}: {}", status, message)),
            500..=599 => ExtractError::Server(format!("HTTP {}: {}", status, message)),
            _ => ExtractError::Unknown(format!("HTTP {}: {}", status, message)),
        }
    }

    /// Classify a failure by its message. Used for errors that arrive as
    /// text rather than as a status code or reqwest error.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") || lower.contains("cancel") {
            ExtractError::Timeout(message.to_string())
        } else if lower.contains("network")
            || lower.contains("connection")
            || lower.contains("connect")
            || lower.contains("dns")
        {
            ExtractError::Network(message.to_string())
        } else if lower.contains("unauthorized")
            || lower.contains("forbidden")
            || lower.contains("api key")
            || lower.contains("credential")
        {
            ExtractError::Server(message.to_string())
        } else if lower.contains("rate limit") || lower.contains("too many requests") {
            ExtractError::RateLimit(message.to_string())
        } else if lower.contains("server error")
            || lower.contains("internal error")
            || lower.contains("bad gateway")
            || lower.contains("unavailable")
        {
            ExtractError::Server(message.to_string())
        } else {
            ExtractError::Unknown(message.to_string())
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::Timeout(err.to_string())
        } else if err.is_connect() {
            ExtractError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            ExtractError::from_status(status.as_u16(), err.to_string())
        } else {
            ExtractError::from_message(&err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ExtractError::from_status(401, "bad key".to_string()).kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_status(403, "forbidden".to_string()).kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_status(429, "slow down".to_string()).kind(),
            ErrorKind::RateLimit
        );
        assert_eq!(
            ExtractError::from_status(500, "oops".to_string()).kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_status(503, "down".to_string()).kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_status(404, "missing".to_string()).kind(),
            ErrorKind::Unknown
        );
        assert_eq!(
            ExtractError::from_status(400, "bad request".to_string()).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_auth_failures_stay_retryable() {
        let err = ExtractError::from_status(401, "unauthorized".to_string());
        assert!(err.retryable());
    }

    #[test]
    fn test_message_classification_priority() {
        // Timeout wording wins even when the message also mentions the network.
        assert_eq!(
            ExtractError::from_message("network request timed out").kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            ExtractError::from_message("connection refused").kind(),
            ErrorKind::Network
        );
        assert_eq!(
            ExtractError::from_message("invalid api key").kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_message("rate limit exceeded").kind(),
            ErrorKind::RateLimit
        );
        assert_eq!(
            ExtractError::from_message("502 bad gateway").kind(),
            ErrorKind::Server
        );
        assert_eq!(
            ExtractError::from_message("something odd happened").kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_only_unknown_is_terminal() {
        assert!(ExtractError::Network("x".to_string()).retryable());
        assert!(ExtractError::RateLimit("x".to_string()).retryable());
        assert!(ExtractError::Timeout("x".to_string()).retryable());
        assert!(ExtractError::Server("x".to_string()).retryable());
        assert!(!ExtractError::Unknown("x".to_string()).retryable());
    }

    #[test]
    fn test_user_messages_are_not_technical() {
        let err = ExtractError::Server("HTTP 500: stack trace here".to_string());
        assert!(!err.user_message().contains("500"));
        assert!(err.to_string().contains("500"));
    }
}
