use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Model artifact not found at {0:?}")]
    ArtifactNotFound(PathBuf),
    #[error("Model artifact at {path:?} could not be loaded: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Inference failed: {0}")]
    InferenceFailure(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::InvalidImage(e.to_string())
    }
}

impl Error {
    /// Startup errors leave the process without a usable model.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ArtifactNotFound(_) | Error::ArtifactCorrupt { .. } | Error::Config(_))
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
      S: serde::ser::Serializer,
    {
      serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn serializes_as_display_string()
    {
        let error = Error::InvalidImage("empty input".to_string());
        let serialized = serde_json::to_string(&error).unwrap();
        assert_eq!(serialized, "\"Invalid image: empty input\"");
    }

    #[test]
    fn startup_errors_are_fatal()
    {
        assert!(Error::ArtifactNotFound(PathBuf::from("model.onnx")).is_fatal());
        assert!(Error::ArtifactCorrupt { path: PathBuf::from("model.onnx"), reason: "bad".to_string() }.is_fatal());
        assert!(!Error::InvalidImage("x".to_string()).is_fatal());
        assert!(!Error::InferenceFailure("x".to_string()).is_fatal());
    }
}
