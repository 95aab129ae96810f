//! Error types for the shade_match library

use thiserror::Error;

/// Result type alias for shade_match operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for color parsing, skin sampling and catalog handling
#[derive(Error, Debug)]
pub enum EngineError {
    /// Color string does not match `#?[0-9A-Fa-f]{6}`
    #[error("Invalid hex color: {input:?} (expected #RRGGBB)")]
    InvalidHexFormat { input: String },

    /// Too few skin-colored pixels survived filtering
    #[error("Insufficient skin samples: found {found} (minimum {minimum})")]
    InsufficientSamples { found: usize, minimum: usize },

    /// Pixel buffer dimensions do not agree with its length
    #[error("Invalid pixel buffer: {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidPixelBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Shade catalog could not be read or parsed
    #[error("Catalog error: {message}")]
    CatalogError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EngineError {
    /// Create an invalid hex error for the rejected input
    pub fn invalid_hex(input: impl Into<String>) -> Self {
        Self::InvalidHexFormat {
            input: input.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a catalog error with context
    pub fn catalog<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CatalogError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if the caller can recover by supplying different input
    ///
    /// Recoverable errors are the ones a user fixes by retaking a photo
    /// or correcting a color value; the engine itself never retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidHexFormat { .. } | EngineError::InsufficientSamples { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            EngineError::InvalidHexFormat { input } => {
                format!("\"{}\" is not a valid color. Please use the #RRGGBB format.", input)
            }
            EngineError::InsufficientSamples { .. } => {
                "Not enough skin was visible in the photo. Please retake it with better \
                 lighting and your face filling the frame."
                    .to_string()
            }
            EngineError::ImageLoadError { .. } | EngineError::InvalidPixelBuffer { .. } => {
                "Could not read the image. Please check the file format and try again.".to_string()
            }
            _ => "Shade matching failed. Please try again.".to_string(),
        }
    }
}
