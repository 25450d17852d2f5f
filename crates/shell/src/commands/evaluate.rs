//! Scoring a set of generated clouds against a reference set.

use std::path::Path;

use gen_metrics::{EvalConfig, Evaluator, MetricReport, RandomSource};
use serde::Serialize;

use crate::data;

/// The report as written to disk, with the settings that produced it.
#[derive(Serialize)]
struct Output<'a> {
    /// The settings of the run.
    config: &'a EvalConfig,
    /// The ShapeNet synset id of the category.
    synset_id: Option<&'static str>,
    /// The metric values.
    metrics: &'a MetricReport,
}

/// Reads both sets of clouds, computes the metrics, prints them and
/// optionally saves them as JSON.
pub fn run(config: &EvalConfig, ref_path: &Path, gen_path: &Path, out_path: Option<&Path>) -> Result<(), String> {
    config.validate()?;
    ftlog::info!(
        "Evaluating method {} on category {} ({:?}).",
        config.method,
        config.category,
        config.synset_id()
    );

    let mut source = RandomSource::from_seed_i64(config.seed);
    let reference = data::read_clouds(ref_path, config.n_points, &mut source)?;
    let sample = data::read_clouds(gen_path, config.n_points, &mut source)?;

    let report = Evaluator::from_config(config)?.evaluate(&reference, &sample)?;
    println!("{report}");

    if let Some(out_path) = out_path {
        let output = Output {
            config,
            synset_id: config.synset_id(),
            metrics: &report,
        };
        let contents = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        std::fs::write(out_path, contents).map_err(|e| e.to_string())?;
        ftlog::info!("Wrote report to {}.", out_path.display());
    }

    Ok(())
}
