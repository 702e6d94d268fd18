use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("feature table has no rows or no CHAIN row")]
    EmptyInput,

    #[error("invalid coordinate for {feature_type} on track {order}: {reason}")]
    InvalidCoordinate {
        feature_type: String,
        order: u32,
        reason: String,
    },

    #[error("track {order} has no CHAIN row")]
    UnknownTrack { order: u32 },

    #[error("track {order} has more than one CHAIN row")]
    DuplicateTrack { order: u32 },

    #[error("rows on track {order} disagree on {field}: '{expected}' vs '{found}'")]
    InconsistentProtein {
        order: u32,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse feature table: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutError {
    pub(crate) fn invalid_coordinate(
        feature_type: impl ToString,
        order: u32,
        reason: impl Into<String>,
    ) -> Self {
        LayoutError::InvalidCoordinate {
            feature_type: feature_type.to_string(),
            order,
            reason: reason.into(),
        }
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;
