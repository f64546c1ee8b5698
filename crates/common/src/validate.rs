//! Precondition checks on caller-supplied data.

use crate::error::ValidationError;

/// Check that every argument is a non-empty string.
///
/// # Arguments
/// * `args` - Arguments in positional order
///
/// # Errors
/// Returns `EmptyArgument` naming the first empty position.
pub fn require_non_empty(args: &[&str]) -> Result<(), ValidationError> {
    match args.iter().position(|arg| arg.is_empty()) {
        Some(index) => Err(ValidationError::EmptyArgument { index }),
        None => Ok(()),
    }
}

/// Check that both pixel dimensions are non-zero.
///
/// # Arguments
/// * `width` - Pixel width
/// * `height` - Pixel height
pub fn require_dimensions(width: u32, height: u32) -> Result<(), ValidationError> {
    if width == 0 || height == 0 {
        return Err(ValidationError::ZeroDimension { width, height });
    }
    Ok(())
}

/// Check that an identifier parses as a UUID.
///
/// # Arguments
/// * `field` - Name of the identifier, used in the error message
/// * `value` - The identifier to check
pub fn require_uuid(field: &'static str, value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidUuid {
            field,
            value: value.to_string(),
        })
}
