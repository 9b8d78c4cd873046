//! Asset error types
//!
//! Errors raised while decoding textures and models.

use std::io;
use std::fmt;

/// Error type for asset operations
#[derive(Debug)]
pub enum AssetError {
    /// IO error (permission denied, truncated read, etc.)
    Io(io::Error),
    /// Image could not be decoded
    Image(String),
    /// OBJ/MTL could not be parsed
    Model(String),
    /// File does not exist
    NotFound(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Image(msg) => write!(f, "Image decode error: {}", msg),
            AssetError::Model(msg) => write!(f, "Model load error: {}", msg),
            AssetError::NotFound(path) => write!(f, "Asset not found: {}", path),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<tobj::LoadError> for AssetError {
    fn from(err: tobj::LoadError) -> Self {
        AssetError::Model(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let msg = format!("{}", AssetError::Io(io_err));
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_not_found_display() {
        let err = AssetError::NotFound("textures/wall.jpg".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("not found"));
        assert!(msg.contains("textures/wall.jpg"));
    }

    #[test]
    fn test_image_and_model_display() {
        assert!(format!("{}", AssetError::Image("bad header".into())).contains("bad header"));
        assert!(format!("{}", AssetError::Model("no faces".into())).contains("no faces"));
    }

    #[test]
    fn test_from_io_error() {
        let err: AssetError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        match err {
            AssetError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = AssetError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert!(AssetError::Image("x".into()).source().is_none());
        assert!(AssetError::NotFound("x".into()).source().is_none());
    }
}
