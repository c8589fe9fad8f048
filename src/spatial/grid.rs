//! Tolerance-based point matching for vertex and tile merging
//!
//! Two points are the same when their L1 distance is below epsilon. Every
//! matcher answers with the earliest inserted match, so the merge decisions
//! depend only on insertion order and not on the data structure.

use crate::io::error::{Result, invalid_parameter};
use nalgebra::Point2;
use std::collections::HashMap;

/// Manhattan distance between two points
pub fn l1_distance(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Reject tolerances that cannot separate distinct points
///
/// # Errors
///
/// Returns an error if `epsilon` is not finite or not strictly positive
pub fn validate_epsilon(epsilon: f64) -> Result<f64> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(epsilon)
    } else {
        Err(invalid_parameter(
            "epsilon",
            &epsilon,
            &"must be finite and greater than zero",
        ))
    }
}

/// Approximate point lookup with insertion-ordered identities
pub trait PointMatcher {
    /// Earliest inserted point within tolerance of `point`
    fn find(&self, point: &Point2<f64>) -> Option<usize>;

    /// Append a point unconditionally and return its identity
    fn insert(&mut self, point: Point2<f64>) -> usize;

    /// Points in insertion order
    fn points(&self) -> &[Point2<f64>];

    /// Return the matching identity or insert; the flag is true on insertion
    fn find_or_insert(&mut self, point: Point2<f64>) -> (usize, bool) {
        match self.find(&point) {
            Some(existing) => (existing, false),
            None => (self.insert(point), true),
        }
    }

    /// Number of stored points
    fn len(&self) -> usize {
        self.points().len()
    }

    /// Whether no point has been stored
    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// Quadratic reference matcher scanning all points in order
#[derive(Debug, Clone)]
pub struct LinearScan {
    epsilon: f64,
    points: Vec<Point2<f64>>,
}

impl LinearScan {
    /// Create an empty matcher
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is invalid
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
            points: Vec::new(),
        })
    }
}

impl PointMatcher for LinearScan {
    fn find(&self, point: &Point2<f64>) -> Option<usize> {
        self.points
            .iter()
            .position(|candidate| l1_distance(candidate, point) < self.epsilon)
    }

    fn insert(&mut self, point: Point2<f64>) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    fn points(&self) -> &[Point2<f64>] {
        &self.points
    }
}

type BucketKey = (i64, i64);

/// Uniform grid of epsilon-sized buckets
///
/// A point within L1 distance epsilon lies in the same or an adjacent bucket,
/// so a lookup searches the 3x3 neighbourhood and keeps the smallest identity.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    epsilon: f64,
    points: Vec<Point2<f64>>,
    buckets: HashMap<BucketKey, Vec<usize>>,
}

impl SpatialHash {
    /// Create an empty matcher
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is invalid
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
            points: Vec::new(),
            buckets: HashMap::new(),
        })
    }

    fn bucket_of(&self, point: &Point2<f64>) -> BucketKey {
        (
            (point.x / self.epsilon).floor() as i64,
            (point.y / self.epsilon).floor() as i64,
        )
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl PointMatcher for SpatialHash {
    fn find(&self, point: &Point2<f64>) -> Option<usize> {
        let (bx, by) = self.bucket_of(point);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                // Keys saturate for tiny epsilons, neighbours past i64 bounds do not exist
                let Some(key) = bx.checked_add(dx).zip(by.checked_add(dy)) else {
                    continue;
                };
                let Some(bucket) = self.buckets.get(&key) else {
                    continue;
                };
                // Buckets are filled in insertion order, the first hit is the earliest
                let hit = bucket.iter().copied().find(|&id| {
                    self.points
                        .get(id)
                        .is_some_and(|candidate| l1_distance(candidate, point) < self.epsilon)
                });
                if let Some(id) = hit {
                    best = Some(best.map_or(id, |current| current.min(id)));
                }
            }
        }
        best
    }

    fn insert(&mut self, point: Point2<f64>) -> usize {
        let id = self.points.len();
        let key = self.bucket_of(&point);
        self.points.push(point);
        self.buckets.entry(key).or_default().push(id);
        id
    }

    fn points(&self) -> &[Point2<f64>] {
        &self.points
    }
}

/// Choice of point matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Bucketed lookup, roughly linear overall
    #[default]
    SpatialHash,
    /// Naive scan, quadratic overall
    LinearScan,
}

impl MatchStrategy {
    /// Build an empty matcher of this kind
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is invalid
    pub fn matcher(self, epsilon: f64) -> Result<Box<dyn PointMatcher>> {
        Ok(match self {
            Self::SpatialHash => Box::new(SpatialHash::new(epsilon)?),
            Self::LinearScan => Box::new(LinearScan::new(epsilon)?),
        })
    }
}
