use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    /// A local file is missing, or the remote service has no record for the key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure or a non-2xx status other than "not found".
    #[error("Unable to reach {service}: {message}")]
    Connectivity { service: String, message: String },

    #[error("Unable to decode response for {key}: {message}")]
    Decode { key: String, message: String },

    /// The rating page carries no rating markup.
    #[error("Rating unavailable for {0}")]
    RatingUnavailable(String),

    #[error("Rating for {slug} is not a number: {raw:?}")]
    InvalidRating { slug: String, raw: String },

    #[error("Invalid rent value for {code_insee}: {raw:?}")]
    InvalidRent { code_insee: String, raw: String },

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A city with the same code_insee is already stored.
    #[error("City already stored: {0}")]
    DuplicateCity(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ScraperError {
    pub fn connectivity(service: &str, err: impl std::fmt::Display) -> Self {
        ScraperError::Connectivity {
            service: service.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(key: &str, err: impl std::fmt::Display) -> Self {
        ScraperError::Decode {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    /// Short label used for log fields and metric outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            ScraperError::NotFound(_) => "not_found",
            ScraperError::Connectivity { .. } => "connectivity",
            ScraperError::Decode { .. } => "decode",
            ScraperError::RatingUnavailable(_) => "rating_unavailable",
            ScraperError::InvalidRating { .. } => "invalid_rating",
            ScraperError::InvalidRent { .. } => "invalid_rent",
            ScraperError::Csv(_) => "csv",
            ScraperError::Json(_) => "json",
            ScraperError::Toml(_) => "toml",
            ScraperError::Io(_) => "io",
            ScraperError::Config(_) => "config",
            ScraperError::DuplicateCity(_) => "duplicate_city",
            ScraperError::Database(_) => "database",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
