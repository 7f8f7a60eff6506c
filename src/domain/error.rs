//! Domain error types.

/// Top-level error type for tinytrader.
#[derive(Debug, thiserror::Error)]
pub enum TinytraderError {
    #[error("unsupported input type: {reason}")]
    UnsupportedInputType { reason: String },

    #[error("no records between {start} and {end}")]
    EmptySeries { start: String, end: String },

    #[error("invalid price at bar {index}: field '{field}' is {}", describe_value(.value))]
    InvalidPrice {
        index: usize,
        field: String,
        value: Option<String>,
    },

    #[error("record {index} has no date field")]
    MissingDate { index: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("not numeric ({v:?})"),
        None => "missing".to_string(),
    }
}

impl From<&TinytraderError> for std::process::ExitCode {
    fn from(err: &TinytraderError) -> Self {
        let code: u8 = match err {
            TinytraderError::Io(_) | TinytraderError::Csv(_) => 1,
            TinytraderError::ConfigParse { .. }
            | TinytraderError::ConfigMissing { .. }
            | TinytraderError::ConfigInvalid { .. }
            | TinytraderError::InvalidParameter { .. } => 2,
            TinytraderError::UnsupportedInputType { .. } | TinytraderError::MissingDate { .. } => 3,
            TinytraderError::EmptySeries { .. } | TinytraderError::InvalidPrice { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_price_message_for_missing_field() {
        let err = TinytraderError::InvalidPrice {
            index: 2,
            field: "close".into(),
            value: None,
        };
        assert_eq!(err.to_string(), "invalid price at bar 2: field 'close' is missing");
    }

    #[test]
    fn invalid_price_message_for_text() {
        let err = TinytraderError::InvalidPrice {
            index: 1,
            field: "close".into(),
            value: Some("n/a".into()),
        };
        assert_eq!(
            err.to_string(),
            "invalid price at bar 1: field 'close' is not numeric (\"n/a\")"
        );
    }

    #[test]
    fn empty_series_message() {
        let err = TinytraderError::EmptySeries {
            start: "2022-02-01".into(),
            end: "2022-01-01".into(),
        };
        assert_eq!(err.to_string(), "no records between 2022-02-01 and 2022-01-01");
    }
}
