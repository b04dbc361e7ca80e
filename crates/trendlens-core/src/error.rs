use thiserror::Error;

/// Errors raised while reading the compact `MM/DD/YYYY: value` series text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("series text is empty")]
    EmptyInput,
    #[error("token {index} must be 'MM/DD/YYYY: value': '{token}'")]
    MalformedToken { index: usize, token: String },
    #[error("date must match MM/DD/YYYY and exist on the calendar: '{value}'")]
    InvalidDate { value: String },
    #[error("value is not a finite integer or decimal: '{value}'")]
    InvalidValue { value: String },
    #[error("dates must be strictly increasing: token {index} ({current}) follows {previous}")]
    DatesNotIncreasing {
        index: usize,
        previous: String,
        current: String,
    },
}

/// Validation and contract errors raised when constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("entity id cannot be empty")]
    EmptyEntityId,
    #[error("entity id length {len} exceeds max {max}")]
    EntityIdTooLong { len: usize, max: usize },
    #[error("entity id contains a control character at index {index}")]
    EntityIdInvalidChar { index: usize },

    #[error("invalid granularity '{value}', expected one of daily, weekly, monthly")]
    InvalidGranularity { value: String },
    #[error("invalid source kind '{value}', expected one of search-volume, social-views, price")]
    InvalidSourceKind { value: String },
    #[error("invalid sort order '{value}'")]
    InvalidSortOrder { value: String },
    #[error("invalid window '{value}', expected <n>d, <n>w or <n>m")]
    InvalidWindow { value: String },

    #[error("value at index {index} must be finite")]
    NonFiniteValue { index: usize },
    #[error("dates must be strictly increasing at index {index}")]
    DatesNotIncreasing { index: usize },
    #[error("dates must be non-decreasing at index {index}")]
    DatesOutOfOrder { index: usize },
    #[error("aligned sides disagree at index {index}")]
    MisalignedPair { index: usize },

    #[error("seasonal period must be at least 2, got {value}")]
    InvalidPeriod { value: usize },
    #[error("loess span must be an odd number of at least 3, got {value}")]
    InvalidSpan { value: usize },
    #[error("projected series must start after {last_historical}")]
    ProjectionOverlap { last_historical: String },
    #[error("period containing {date} extends past the supported calendar")]
    DateOutOfRange { date: String },
    #[error("cannot resample {from} data to {to}")]
    InvalidResample { from: String, to: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must look like v<major>.<minor>.<patch>, got '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("timestamp cannot be rendered as RFC3339")]
    InvalidTimestamp,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for analytics operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("decomposition needs at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("no overlapping dates remain after alignment")]
    EmptyAlignment,
}

impl CoreError {
    /// Stable machine-readable code for envelopes and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Format(_) => "format_error",
            Self::Validation(_) => "validation_error",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::EmptyAlignment => "empty_alignment",
        }
    }
}
