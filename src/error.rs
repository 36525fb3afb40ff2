/// Errors surfaced by the coach library.
///
/// The sectionizer never produces one of these; it degrades to an empty or
/// partial outline instead.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CoachError::MissingField("age").to_string(),
            "missing required field: age"
        );
        let api = CoachError::Api {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(api.to_string(), "API error 429: quota exceeded");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let coach: CoachError = err.into();
        assert!(matches!(coach, CoachError::Decode(_)));
    }
}
