//! Saving the distance matrices between two sets of clouds.

use std::path::Path;

use cloud_distances::select_backend;
use gen_metrics::{EvalConfig, PairwiseMatrixBuilder, RandomSource};

use crate::data;

/// Reads one or two sets of clouds and writes their Chamfer (and optionally
/// EMD) matrices into `out_dir`.
pub fn run(config: &EvalConfig, inp_path: &Path, other_path: Option<&Path>, out_dir: &Path) -> Result<(), String> {
    let backend = select_backend(config.backend_kind()?);
    let builder = PairwiseMatrixBuilder::new(backend.as_ref(), config.batch_size)?
        .with_emd(config.compute_emd)
        .with_memory_limit(config.memory_limit);

    let mut source = RandomSource::from_seed_i64(config.seed);
    let first = data::read_clouds(inp_path, config.n_points, &mut source)?;
    let matrices = match other_path {
        Some(other_path) => {
            let second = data::read_clouds(other_path, config.n_points, &mut source)?;
            builder.build(&first, &second)?
        }
        None => builder.build_within(&first)?,
    };

    if !out_dir.exists() {
        std::fs::create_dir_all(out_dir).map_err(|e| e.to_string())?;
    }
    data::write_matrix(out_dir.join("chamfer.npy"), &matrices.chamfer)?;
    if let Some(emd) = &matrices.emd {
        data::write_matrix(out_dir.join("emd.npy"), emd)?;
    }

    Ok(())
}
