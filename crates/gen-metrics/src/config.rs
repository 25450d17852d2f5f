//! Settings of an evaluation run.

use serde::{Deserialize, Serialize};

use crate::{BackendKind, DistanceError};

/// Known shape categories and their ShapeNet synset ids.
pub const CATEGORIES: [(&str, &str); 2] = [("car", "02958343"), ("chair", "03001627")];

/// Known generative methods.
pub const METHODS: [&str; 2] = ["pointflow", "ours"];

/// Everything that determines the outcome of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// The number of points each cloud is subsampled to.
    pub n_points: usize,
    /// The number of clouds per backend call.
    pub batch_size: usize,
    /// The number of neighbors voting in the 1-NN test.
    pub k: usize,
    /// Whether to also compute EMD-based metrics.
    pub compute_emd: bool,
    /// Whether the 1-NN test uses the square roots of the distances.
    pub sqrt: bool,
    /// Whether to also report the mean distance between the `i`-th sample
    /// and the `i`-th reference.
    pub paired: bool,
    /// Seed for subsampling; negative for an unseeded run.
    pub seed: i64,
    /// Optional budget, in bytes, for one chunk's distance buffer.
    pub memory_limit: Option<usize>,
    /// Which distance backend to use: `auto`, `reference` or `parallel`.
    pub backend: String,
    /// The shape category being evaluated.
    pub category: String,
    /// The generative method that produced the samples.
    pub method: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            n_points: 2048,
            batch_size: 50,
            k: 1,
            compute_emd: false,
            sqrt: false,
            paired: false,
            seed: 41,
            memory_limit: None,
            backend: "auto".to_string(),
            category: "chair".to_string(),
            method: "ours".to_string(),
        }
    }
}

impl EvalConfig {
    /// The ShapeNet synset id of the category, if it is known.
    #[must_use]
    pub fn synset_id(&self) -> Option<&'static str> {
        CATEGORIES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.category))
            .map(|&(_, id)| id)
    }

    /// The configured backend.
    ///
    /// # Errors
    ///
    /// - If the backend name is not recognized.
    pub fn backend_kind(&self) -> Result<BackendKind, DistanceError> {
        BackendKind::from_name(&self.backend)
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// - If `n_points`, `batch_size` or `k` is zero.
    /// - If the backend, category or method is not recognized.
    pub fn validate(&self) -> Result<(), DistanceError> {
        let positive = [("n_points", self.n_points), ("batch_size", self.batch_size), ("k", self.k)];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(DistanceError::usage(format!("`{name}` must be positive")));
        }
        self.backend_kind()?;
        if self.synset_id().is_none() {
            return Err(DistanceError::usage(format!(
                "unknown category `{}`; expected one of {:?}",
                self.category,
                CATEGORIES.map(|(name, _)| name)
            )));
        }
        if !METHODS.iter().any(|m| m.eq_ignore_ascii_case(&self.method)) {
            return Err(DistanceError::usage(format!(
                "unknown method `{}`; expected one of {METHODS:?}",
                self.method
            )));
        }
        Ok(())
    }
}
