use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error};
use ndarray::Array4;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::{Error, Result};
use crate::label::ClassLabel;
use crate::model::ScoreModel;
use crate::preprocessing::{self, Image};

/// Turns images into waste categories.
///
/// Holds a shared handle to the loaded model; the model is never mutated after
/// loading, so one classifier can serve any number of callers at once.
pub struct Classifier
{
    model: Arc<dyn ScoreModel>,
    timeout: Option<Duration>,
}

impl Classifier
{
    pub fn new(model: Arc<dyn ScoreModel>) -> Self
    {
        Classifier { model, timeout: None }
    }

    /// Bounds the time a single inference may take. Expiry is reported as an inference failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self
    {
        self.timeout = timeout;
        self
    }

    pub fn classify(&self, image: &Image) -> Result<ClassLabel>
    {
        let input = preprocessing::image_to_model_format(image);

        let now = Instant::now();
        let result = self.run_model(input)
            .and_then(|scores| {
                debug!("Scores {:?}", scores);
                ClassLabel::from_scores(&scores)
            });
        debug!("Inference took {:?}", now.elapsed());

        if let Err(e) = &result {
            error!("Classification failed: {}", e);
        }
        result
    }

    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<ClassLabel>
    {
        let image = Image::decode(bytes)?;
        self.classify(&image)
    }

    pub fn classify_path(&self, path: &Path) -> Result<ClassLabel>
    {
        let image = Image::open(path)?;
        self.classify(&image)
    }

    /// Classifies many files. Decoding and preprocessing run in parallel.
    /// Returns one result per path, in the order given.
    pub fn classify_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<ClassLabel>)>
    {
        paths.par_iter()
            .map(|path| (path.clone(), self.classify_path(path)))
            .collect()
    }

    fn run_model(&self, input: Array4<f32>) -> Result<Vec<f32>>
    {
        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => return self.model.scores(input),
        };

        let model = Arc::clone(&self.model);
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // The receiver is gone if the caller already gave up.
            let _ = sender.send(model.scores(input));
        });

        match receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(Error::InferenceFailure(format!("inference did not finish within {:?}", timeout)))
            },
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(Error::InferenceFailure("inference worker exited without a result".to_string()))
            },
        }
    }
}
