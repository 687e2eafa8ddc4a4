//! Error types and variant context for rebuild operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all rebuild operations
#[derive(Debug)]
pub enum RebuildError {
    /// Failed to load an input image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rebuilt image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Source image is not the fixed 512x512 size
    InvalidSourceDimensions {
        /// Actual source width
        width: u32,
        /// Actual source height
        height: u32,
    },

    /// Comparison letter outside the recognised set
    InvalidType {
        /// The rejected letter
        letter: char,
    },

    /// Source partition produced no blocks to match against
    EmptySourcePartition,

    /// Detail threshold outside the 1-10 range
    ThresholdOutOfRange {
        /// Which threshold was rejected (`medium` or `small`)
        name: &'static str,
        /// Provided value
        value: u8,
    },

    /// Rebuild parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A single output variant failed while the rest of the run continued
    VariantFailed {
        /// Label of the failed variant (for example `lg_hdr`)
        variant: String,
        /// The error that stopped the variant
        source: Box<Self>,
    },
}

impl fmt::Display for RebuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(f, "Failed to export image '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidSourceDimensions { width, height } => {
                write!(
                    f,
                    "Source image must be {size}x{size}, got {width}x{height}",
                    size = crate::io::configuration::SOURCE_DIMENSION
                )
            }
            Self::InvalidType { letter } => {
                write!(
                    f,
                    "Invalid comparison type '{letter}' (expected one of l, h, s, v, r, g, b or c)"
                )
            }
            Self::EmptySourcePartition => {
                write!(f, "Source partition contains no blocks")
            }
            Self::ThresholdOutOfRange { name, value } => {
                write!(f, "The {name} threshold {value} is outside the range 1-10")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::VariantFailed { variant, source } => {
                write!(f, "Variant '{variant}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for RebuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::VariantFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for rebuild results
pub type Result<T> = std::result::Result<T, RebuildError>;

/// Attaches the label of the output variant being rendered to an error
pub trait WithVariant<T> {
    /// Wrap any error in [`RebuildError::VariantFailed`]
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped with the variant label
    fn with_variant(self, variant: &str) -> Result<T>;
}

impl<T> WithVariant<T> for Result<T> {
    fn with_variant(self, variant: &str) -> Result<T> {
        self.map_err(|error| {
            // Already labelled errors keep their innermost variant
            if matches!(error, RebuildError::VariantFailed { .. }) {
                error
            } else {
                RebuildError::VariantFailed {
                    variant: variant.to_string(),
                    source: Box::new(error),
                }
            }
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> RebuildError {
    RebuildError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
