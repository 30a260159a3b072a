use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use log::{debug, info};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use crate::error::{Error, Result};

/// A pretrained classifier, viewed as a deterministic function from a
/// preprocessed (1, 224, 224, 3) tensor to one score per class.
pub trait ScoreModel: Send + Sync
{
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>>;
}

/// The waste classification model, executed with the ONNX runtime.
///
/// The model is the Keras CNN exported to ONNX, so its single input is NHWC
/// and its first output holds the two class probabilities.
/// A session run needs exclusive access, so concurrent callers are serialized here;
/// preprocessing still happens outside the lock.
pub struct OnnxModel
{
    path: PathBuf,
    session: Mutex<Session>,
}

impl OnnxModel
{
    /// Loads the model artifact. Intended to be called once at startup.
    pub fn load(path: &Path) -> Result<Self>
    {
        if !path.is_file() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        let now = Instant::now();
        let session = Session::builder()
            .map_err(|e| corrupt(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| corrupt(path, e))?
            .with_intra_threads(4)
            .map_err(|e| corrupt(path, e))?
            .commit_from_file(path)
            .map_err(|e| corrupt(path, e))?;
        info!("Loaded model {:?} in {:?}", path, now.elapsed());

        Ok(OnnxModel { path: path.to_path_buf(), session: Mutex::new(session) })
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }
}

impl ScoreModel for OnnxModel
{
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>>
    {
        debug!("Running {:?} on input of shape {:?}", self.path, input.shape());
        let tensor = Tensor::from_array(input).map_err(inference_failure)?;

        let mut session = self.session.lock()
            .map_err(|_| Error::InferenceFailure("model session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![tensor]).map_err(inference_failure)?;

        // Output: [[0.93, 0.07]], shape=[1, 2]
        let output = outputs[0].try_extract_array::<f32>().map_err(inference_failure)?;
        let scores = output.iter().copied().collect();

        Ok(scores)
    }
}

fn corrupt(path: &Path, e: impl Display) -> Error
{
    Error::ArtifactCorrupt { path: path.to_path_buf(), reason: e.to_string() }
}

fn inference_failure(e: impl Display) -> Error
{
    Error::InferenceFailure(e.to_string())
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_artifact_is_not_found()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waste_classification_model.onnx");
        assert!(matches!(OnnxModel::load(&path), Err(Error::ArtifactNotFound(p)) if p == path));
    }

    #[test]
    fn directory_is_not_an_artifact()
    {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(OnnxModel::load(dir.path()), Err(Error::ArtifactNotFound(_))));
    }

    #[test]
    fn garbage_artifact_is_corrupt()
    {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not an onnx graph").unwrap();
        assert!(matches!(OnnxModel::load(file.path()), Err(Error::ArtifactCorrupt { .. })));
    }
}
