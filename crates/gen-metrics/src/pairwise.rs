//! Batched construction of distance matrices between collections of clouds.
//!
//! Every cloud of the first collection is compared against the second
//! collection in chunks of `batch_size` clouds. The first cloud is broadcast
//! over the chunk without copying, so one backend call fills one slice of a
//! matrix row. The values do not depend on the chunking.

use ndarray::{s, Array1, Array2, Array3, Axis};

use cloud_distances::{chamfer::scores, select_backend, stack};

use crate::{BackendKind, DistanceBackend, DistanceError, DistanceKind, DistanceMatrix, MetricReport, PointCloud};

/// Relative tolerance for the symmetry of within-set matrices.
pub const SYMMETRY_TOL: f32 = 1e-5;

/// The distance matrices between two collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrices {
    /// Chamfer scores.
    pub chamfer: DistanceMatrix,
    /// EMD values, if requested.
    pub emd: Option<DistanceMatrix>,
}

impl PairwiseMatrices {
    /// The matrix for the given kind of distance, if it was computed.
    #[must_use]
    pub const fn get(&self, kind: DistanceKind) -> Option<&DistanceMatrix> {
        match kind {
            DistanceKind::Chamfer => Some(&self.chamfer),
            DistanceKind::Emd => self.emd.as_ref(),
        }
    }
}

/// Distances between the `i`-th clouds of two equally sized collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedDistances {
    /// Chamfer score of each pair.
    pub chamfer: Array1<f32>,
    /// EMD of each pair, if requested.
    pub emd: Option<Array1<f32>>,
}

impl PairedDistances {
    /// The mean distance over all pairs, under the keys `MMD-CD` and `MMD-EMD`.
    #[must_use]
    pub fn report(&self) -> MetricReport {
        let mut report = MetricReport::default();
        let entries = [(DistanceKind::Chamfer, Some(&self.chamfer)), (DistanceKind::Emd, self.emd.as_ref())];
        for (kind, values) in entries {
            if let Some(mean) = values.and_then(|v| v.mean()) {
                report.insert(format!("MMD-{}", kind.suffix()), f64::from(mean));
            }
        }
        report
    }
}

/// Builds distance matrices with a fixed backend and batch size.
pub struct PairwiseMatrixBuilder<'a> {
    /// Computes the batched distances.
    backend: &'a dyn DistanceBackend,
    /// The number of clouds of the second collection per backend call.
    batch_size: usize,
    /// Whether to also compute EMD.
    compute_emd: bool,
    /// Optional budget, in bytes, for the squared-distance buffer of a chunk.
    memory_limit: Option<usize>,
}

impl std::fmt::Debug for PairwiseMatrixBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairwiseMatrixBuilder")
            .field("batch_size", &self.batch_size)
            .field("compute_emd", &self.compute_emd)
            .field("memory_limit", &self.memory_limit)
            .finish_non_exhaustive()
    }
}

impl<'a> PairwiseMatrixBuilder<'a> {
    /// Creates a builder that computes only Chamfer matrices.
    ///
    /// # Errors
    ///
    /// - If `batch_size` is zero.
    pub fn new(backend: &'a dyn DistanceBackend, batch_size: usize) -> Result<Self, DistanceError> {
        if batch_size == 0 {
            return Err(DistanceError::usage("batch size must be positive"));
        }
        Ok(Self {
            backend,
            batch_size,
            compute_emd: false,
            memory_limit: None,
        })
    }

    /// Sets whether EMD matrices are computed alongside Chamfer.
    #[must_use]
    pub fn with_emd(mut self, compute_emd: bool) -> Self {
        self.compute_emd = compute_emd;
        self
    }

    /// Sets a memory budget, in bytes, for the distance buffer of one chunk.
    #[must_use]
    pub fn with_memory_limit(mut self, memory_limit: Option<usize>) -> Self {
        self.memory_limit = memory_limit;
        self
    }

    /// The `first.len() x second.len()` distance matrices.
    ///
    /// # Errors
    ///
    /// - If either collection is empty.
    /// - If the clouds of `second` do not share a point count.
    /// - If EMD is requested and the point counts of the two collections
    ///   differ.
    /// - If a chunk would exceed the memory budget.
    pub fn build(&self, first: &[PointCloud], second: &[PointCloud]) -> Result<PairwiseMatrices, DistanceError> {
        if first.is_empty() || second.is_empty() {
            return Err(logged(DistanceError::usage(format!(
                "cannot build a distance matrix for collections of {} and {} clouds",
                first.len(),
                second.len()
            ))));
        }

        let (n, m) = (first.len(), second.len());
        let chunks = second
            .chunks(self.batch_size)
            .map(stack)
            .collect::<Result<Vec<_>, _>>()
            .map_err(logged)?;
        ftlog::info!(
            "Building {n} x {m} distance matrix with the {} backend in {} chunk(s) of up to {} clouds (EMD: {}).",
            self.backend.name(),
            chunks.len(),
            self.batch_size,
            self.compute_emd
        );

        let mut chamfer = Array2::zeros((n, m));
        let mut emd = if self.compute_emd { Some(Array2::zeros((n, m))) } else { None };

        for (i, cloud) in first.iter().enumerate() {
            let mut start = 0;
            for chunk in &chunks {
                let len = chunk.len_of(Axis(0));
                self.check_budget(len, cloud.len(), chunk.len_of(Axis(1)))?;

                let (row_chamfer, row_emd) = self.compare(cloud, chunk)?;
                chamfer.slice_mut(s![i, start..start + len]).assign(&row_chamfer);
                if let (Some(emd), Some(row_emd)) = (emd.as_mut(), row_emd) {
                    emd.slice_mut(s![i, start..start + len]).assign(&row_emd);
                }
                start += len;
            }
            ftlog::debug!("Finished row {}/{n}.", i + 1);
        }

        Ok(PairwiseMatrices {
            chamfer: DistanceMatrix::new(chamfer),
            emd: emd.map(DistanceMatrix::new),
        })
    }

    /// The distance matrices of a collection against itself.
    ///
    /// # Errors
    ///
    /// - See [`PairwiseMatrixBuilder::build`].
    /// - If a resulting matrix is not symmetric within [`SYMMETRY_TOL`].
    pub fn build_within(&self, clouds: &[PointCloud]) -> Result<PairwiseMatrices, DistanceError> {
        let matrices = self.build(clouds, clouds)?;
        matrices.chamfer.check_symmetric(SYMMETRY_TOL).map_err(logged)?;
        if let Some(emd) = &matrices.emd {
            emd.check_symmetric(SYMMETRY_TOL).map_err(logged)?;
        }
        Ok(matrices)
    }

    /// The distances between the `i`-th clouds of `first` and `second`.
    ///
    /// # Errors
    ///
    /// - If the collections differ in size or are empty.
    /// - If the clouds within either collection do not share a point count.
    /// - If EMD is requested and the point counts of the two collections
    ///   differ.
    /// - If a chunk would exceed the memory budget.
    pub fn build_paired(&self, first: &[PointCloud], second: &[PointCloud]) -> Result<PairedDistances, DistanceError> {
        if first.len() != second.len() || first.is_empty() {
            return Err(logged(DistanceError::usage(format!(
                "paired distances need two non-empty collections of equal size, got {} and {}",
                first.len(),
                second.len()
            ))));
        }
        ftlog::info!("Computing {} paired distances (EMD: {}).", first.len(), self.compute_emd);

        let mut chamfer = Vec::with_capacity(first.len());
        let mut emd = Vec::with_capacity(if self.compute_emd { first.len() } else { 0 });
        for (a, b) in first.chunks(self.batch_size).zip(second.chunks(self.batch_size)) {
            let (a, b) = (stack(a).map_err(logged)?, stack(b).map_err(logged)?);
            self.check_budget(a.len_of(Axis(0)), a.len_of(Axis(1)), b.len_of(Axis(1)))?;

            let (a_to_b, b_to_a) = self.backend.chamfer(a.view(), b.view()).map_err(logged)?;
            chamfer.extend(scores(a_to_b.view(), b_to_a.view()).iter().copied());
            if self.compute_emd {
                let values = self.backend.emd(a.view(), b.view()).map_err(logged)?;
                emd.extend(values.iter().copied());
            }
        }

        Ok(PairedDistances {
            chamfer: Array1::from(chamfer),
            emd: if self.compute_emd { Some(Array1::from(emd)) } else { None },
        })
    }

    /// Compares one cloud against every cloud of a stacked chunk.
    fn compare(
        &self,
        cloud: &PointCloud,
        chunk: &Array3<f32>,
    ) -> Result<(Array1<f32>, Option<Array1<f32>>), DistanceError> {
        let len = chunk.len_of(Axis(0));
        let a = cloud
            .broadcast(len)
            .ok_or_else(|| logged(DistanceError::usage("cannot broadcast cloud over the chunk")))?;

        let (a_to_b, b_to_a) = self.backend.chamfer(a, chunk.view()).map_err(logged)?;
        let emd = if self.compute_emd {
            Some(self.backend.emd(a, chunk.view()).map_err(logged)?)
        } else {
            None
        };
        Ok((scores(a_to_b.view(), b_to_a.view()), emd))
    }

    /// Fails if the `chunk x n x m` squared-distance buffer is over budget.
    fn check_budget(&self, chunk: usize, n: usize, m: usize) -> Result<(), DistanceError> {
        let Some(limit) = self.memory_limit else {
            return Ok(());
        };
        let needed = chunk
            .saturating_mul(n)
            .saturating_mul(m)
            .saturating_mul(core::mem::size_of::<f32>());
        if needed > limit {
            return Err(logged(DistanceError::resource(format!(
                "a chunk of {chunk} clouds needs {needed} bytes for distances of {n} x {m} points, \
                 over the budget of {limit} bytes; reduce the batch size (currently {})",
                self.batch_size
            ))));
        }
        Ok(())
    }
}

/// Logs an error before it is returned.
fn logged(err: DistanceError) -> DistanceError {
    ftlog::error!("{err}");
    err
}

/// The distance matrices between two collections, using the best available
/// backend.
///
/// # Errors
///
/// See [`PairwiseMatrixBuilder::new`] and [`PairwiseMatrixBuilder::build`].
pub fn pairwise_matrix(
    first: &[PointCloud],
    second: &[PointCloud],
    batch_size: usize,
    compute_emd: bool,
) -> Result<PairwiseMatrices, DistanceError> {
    let backend = select_backend(BackendKind::Auto);
    PairwiseMatrixBuilder::new(backend.as_ref(), batch_size)?
        .with_emd(compute_emd)
        .build(first, second)
}

#[cfg(test)]
mod tests {
    use cloud_distances::ReferenceBackend;

    use super::*;

    fn line(offset: f32) -> PointCloud {
        PointCloud::from_points(&[[offset, 0., 0.], [offset + 1., 0., 0.]]).unwrap()
    }

    #[test]
    fn zero_batch_size() {
        assert!(PairwiseMatrixBuilder::new(&ReferenceBackend, 0).unwrap_err().is_usage());
    }

    #[test]
    fn fills_every_entry() {
        let first = [line(0.), line(1.), line(3.)];
        let second = [line(0.), line(2.)];
        let matrices = PairwiseMatrixBuilder::new(&ReferenceBackend, 1)
            .unwrap()
            .with_emd(true)
            .build(&first, &second)
            .unwrap();

        // line(0) vs line(2): nearest squared distances are [4, 1] and [1, 4]
        let expected = [[0., 5.], [1., 1.], [13., 1.]];
        for (i, row) in expected.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert!(float_cmp::approx_eq!(f32, matrices.chamfer.get(i, j).unwrap(), v, ulps = 4));
            }
        }

        let emd = matrices.emd.unwrap();
        assert_eq!(emd.get(0, 0), Some(0.));
        assert!(float_cmp::approx_eq!(f32, emd.get(2, 1).unwrap(), 1., ulps = 4));
    }

    #[test]
    fn emd_is_skipped_unless_requested() {
        let clouds = [line(0.), line(1.)];
        let matrices = PairwiseMatrixBuilder::new(&ReferenceBackend, 8)
            .unwrap()
            .build_within(&clouds)
            .unwrap();
        assert!(matrices.emd.is_none());
        assert!(matrices.get(DistanceKind::Emd).is_none());
    }

    #[test]
    fn over_budget_chunk_fails() {
        let clouds = [line(0.), line(1.), line(2.)];
        // 3 clouds x 2 x 2 points x 4 bytes = 48 bytes
        let builder = PairwiseMatrixBuilder::new(&ReferenceBackend, 3)
            .unwrap()
            .with_memory_limit(Some(47));
        let err = builder.build(&clouds, &clouds).unwrap_err();
        assert!(err.is_resource());
        assert!(err.to_string().contains("reduce the batch size"));

        let builder = builder.with_memory_limit(Some(48));
        assert!(builder.build(&clouds, &clouds).is_ok());
    }

    #[test]
    fn paired_distances() {
        let first = [line(0.), line(1.), line(3.)];
        let second = [line(0.), line(2.), line(3.)];
        let paired = PairwiseMatrixBuilder::new(&ReferenceBackend, 2)
            .unwrap()
            .with_emd(true)
            .build_paired(&first, &second)
            .unwrap();
        assert_eq!(paired.chamfer.len(), 3);
        assert!(float_cmp::approx_eq!(f32, paired.chamfer[1], 1., ulps = 4));

        let report = paired.report();
        assert!(float_cmp::approx_eq!(f64, report.get("MMD-CD").unwrap(), 1. / 3., epsilon = 1e-6));
        assert!(float_cmp::approx_eq!(f64, report.get("MMD-EMD").unwrap(), 1. / 3., epsilon = 1e-6));

        let builder = PairwiseMatrixBuilder::new(&ReferenceBackend, 2).unwrap();
        assert!(builder.build_paired(&first, &second[..2]).is_err());
    }
}
