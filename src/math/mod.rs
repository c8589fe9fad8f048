//! Numeric foundations of the tiling pipeline

/// Exact arithmetic in quadratic number fields
pub mod quadratic;
/// Homogeneous similarity transforms for tile placement
pub mod transform;
