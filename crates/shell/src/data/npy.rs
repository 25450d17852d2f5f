//! Element types we might read from npy files.

use std::path::Path;

use ndarray::Array3;

/// The element types of point arrays that can be read.
pub enum NpyType {
    /// Single-precision floats.
    F32,
    /// Double-precision floats, narrowed to `f32`.
    F64,
}

impl NpyType {
    /// Reads an `n x P x 3` array of points, converting them to `f32`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Array3<f32>, String> {
        for ty in Self::variants() {
            if let Ok(data) = ty.read_with_type(&path) {
                return Ok(data);
            }
        }
        Err(format!(
            "Failed to read an array of f32 or f64 points from NPY file at path: {}",
            path.as_ref().display()
        ))
    }

    /// The types to try, in order.
    const fn variants() -> &'static [Self] {
        &[Self::F32, Self::F64]
    }

    /// Reads an array from a NPY file with a specific type.
    #[allow(clippy::cast_possible_truncation)]
    fn read_with_type<P: AsRef<Path>>(&self, path: P) -> Result<Array3<f32>, String> {
        match self {
            Self::F32 => ndarray_npy::read_npy::<_, Array3<f32>>(path).map_err(|e| e.to_string()),
            Self::F64 => ndarray_npy::read_npy::<_, Array3<f64>>(path)
                .map(|points| points.mapv(|v| v as f32))
                .map_err(|e| e.to_string()),
        }
    }
}
