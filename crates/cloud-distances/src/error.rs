//! Errors raised while computing distances between point clouds.

/// Failures of the distance engine.
///
/// Neither variant is recoverable by retrying with the same inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceError {
    /// The inputs do not satisfy the contract of the operation, e.g.
    /// mismatched batch sizes, points that are not 3-dimensional, or clouds
    /// of unequal size given to EMD.
    Usage(String),
    /// A batch would need more memory than the configured budget allows.
    Resource(String),
}

impl DistanceError {
    /// Shorthand for building a `Usage` error.
    pub fn usage<S: Into<String>>(msg: S) -> Self {
        Self::Usage(msg.into())
    }

    /// Shorthand for building a `Resource` error.
    pub fn resource<S: Into<String>>(msg: S) -> Self {
        Self::Resource(msg.into())
    }

    /// Whether this is a usage error.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Whether this is a resource error.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

impl std::fmt::Display for DistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "usage error: {msg}"),
            Self::Resource(msg) => write!(f, "resource error: {msg}"),
        }
    }
}

impl std::error::Error for DistanceError {}

impl From<DistanceError> for String {
    fn from(err: DistanceError) -> Self {
        err.to_string()
    }
}
