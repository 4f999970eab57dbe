//! Error types for the cell simulation

use std::fmt;

/// Errors that can occur while configuring, loading or decomposing
#[derive(Debug, Clone)]
pub enum SoapError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// The reference image could not be opened or decoded
    ImageLoad(String),
    /// Too few distinct points, or all of them collinear/coincident
    DegenerateGeometry(String),
    /// A center was placed outside the simulation bounds
    CenterOutOfBounds {
        /// Index of the offending center
        index: usize,
        /// Requested x coordinate
        x: f64,
        /// Requested y coordinate
        y: f64,
    },
}

impl fmt::Display for SoapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            SoapError::ImageLoad(msg) => write!(f, "image load failed: {}", msg),
            SoapError::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            SoapError::CenterOutOfBounds { index, x, y } => {
                write!(f, "center {} at ({}, {}) is out of bounds", index, x, y)
            }
        }
    }
}

impl std::error::Error for SoapError {}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SoapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_informative() {
        let err = SoapError::InvalidConfig("friction must be in (0, 1]".to_string());
        let msg = err.to_string();
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("friction"));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = SoapError::CenterOutOfBounds { index: 3, x: 120.0, y: -1.0 };
        assert_eq!(err.to_string(), "center 3 at (120, -1) is out of bounds");
    }
}
