use thiserror::Error;

/// Errors surfaced by card rendering and theme management. None of them are
/// fatal to the hosting page; callers decide whether to escalate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),
    #[error("{card} card #{index} is missing field `{field}`")]
    MissingField {
        card: &'static str,
        index: usize,
        field: &'static str,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Subscription error: {0}")]
    Subscription(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Document error: {0}")]
    Dom(String),
    #[error("Invalid card records")]
    Records(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn invalid_theme_message_names_the_rejected_value() {
        let err = Error::InvalidTheme("neon".to_string());
        assert_eq!(err.to_string(), "Invalid theme: neon");
    }

    #[test]
    fn missing_field_message_locates_the_record() {
        let err = Error::MissingField {
            card: "policy",
            index: 2,
            field: "title",
        };
        assert_eq!(err.to_string(), "policy card #2 is missing field `title`");
    }
}
