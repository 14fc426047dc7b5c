//! Error taxonomy for a generation request.
//!
//! Every variant is terminal for the request that raised it: the engine is
//! pure, so retrying with the same parameters reproduces the same fault.

pub type NoiseResult<T> = Result<T, NoiseError>;

#[derive(thiserror::Error, Debug)]
pub enum NoiseError {
    /// Parameters rejected before any pixel is computed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The raster buffer or a kernel table could not be allocated.
    #[error("render error: {0}")]
    Render(String),

    /// The codec for the requested format failed or is unavailable.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl NoiseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<image::ImageError> for NoiseError {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(NoiseError::validation("x").to_string().starts_with("validation error:"));
        assert!(NoiseError::render("x").to_string().starts_with("render error:"));
        assert!(NoiseError::encoding("x").to_string().starts_with("encoding error:"));
    }

    #[test]
    fn image_errors_become_encoding_errors() {
        let err: NoiseError = image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        ))
        .into();
        assert!(matches!(err, NoiseError::Encoding(_)));
        assert!(!err.is_validation());
    }
}
