//! The flat, ordered map of metric names to values produced by an evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metric values keyed by name, e.g. `lgan_mmd-CD` or `1-NN-CD-acc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricReport(BTreeMap<String, f64>);

impl MetricReport {
    /// Sets the value of a metric, replacing any previous value.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// The value of a metric, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Adds all entries of `other`, which win on key collisions.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// The metrics in lexicographic order of their names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The number of metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the report holds no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for MetricReport {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for MetricReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.0.keys().map(String::len).max().unwrap_or(0);
        for (name, value) in &self.0 {
            writeln!(f, "{name:<width$} : {value:.6e}")?;
        }
        Ok(())
    }
}
