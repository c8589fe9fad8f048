use crate::io::error::{Result, invalid_parameter};
use bitvec::prelude::*;
use std::fmt;

/// Finite set of candidate heights for one variable
///
/// Stores membership of every integer in `[lower, upper]` as one bit, so
/// membership tests and removals are O(1) and intersections are word-wise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightDomain {
    bits: BitVec,
    lower: i64,
}

impl HeightDomain {
    /// Domain containing every integer in `[lower, upper]`
    ///
    /// # Errors
    ///
    /// Returns an error if `lower > upper`
    pub fn range(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(invalid_parameter(
                "domain",
                &format!("[{lower}, {upper}]"),
                &"lower bound exceeds upper bound",
            ));
        }
        let width = usize::try_from(upper - lower + 1)
            .map_err(|_| invalid_parameter("domain", &upper, &"range too wide"))?;
        Ok(Self {
            bits: bitvec![1; width],
            lower,
        })
    }

    /// Smallest value representable by this domain
    pub const fn lower(&self) -> i64 {
        self.lower
    }

    /// Largest value representable by this domain
    pub fn upper(&self) -> i64 {
        self.lower + self.bits.len() as i64 - 1
    }

    fn slot(&self, value: i64) -> Option<usize> {
        usize::try_from(value - self.lower)
            .ok()
            .filter(|&slot| slot < self.bits.len())
    }

    /// Test membership
    pub fn contains(&self, value: i64) -> bool {
        self.slot(value)
            .and_then(|slot| self.bits.get(slot).as_deref().copied())
            .unwrap_or(false)
    }

    /// Remove a value; returns whether the domain changed
    pub fn remove(&mut self, value: i64) -> bool {
        match self.slot(value) {
            Some(slot) if self.bits.get(slot).as_deref() == Some(&true) => {
                self.bits.set(slot, false);
                true
            }
            _ => false,
        }
    }

    /// Add a value inside the representable range; returns whether the domain changed
    pub fn insert(&mut self, value: i64) -> bool {
        match self.slot(value) {
            Some(slot) if self.bits.get(slot).as_deref() == Some(&false) => {
                self.bits.set(slot, true);
                true
            }
            _ => false,
        }
    }

    /// Narrow to a single value; returns whether the domain changed
    pub fn assign(&mut self, value: i64) -> bool {
        let before = self.bits.count_ones();
        let keep = self.contains(value);
        self.bits.fill(false);
        if keep {
            self.insert(value);
        }
        before != self.bits.count_ones()
    }

    /// Keep only values satisfying `predicate`; returns whether the domain changed
    pub fn retain(&mut self, mut predicate: impl FnMut(i64) -> bool) -> bool {
        let doomed: Vec<i64> = self.iter().filter(|&value| !predicate(value)).collect();
        for value in &doomed {
            self.remove(*value);
        }
        !doomed.is_empty()
    }

    /// Intersect in place; returns whether the domain changed
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.retain(|value| other.contains(value))
    }

    /// Add every value of `other` that this domain can represent
    pub fn union_with(&mut self, other: &Self) {
        for value in other.iter() {
            self.insert(value);
        }
    }

    /// Domain with no values and the same representable range
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            bits: bitvec![0; self.bits.len()],
            lower: self.lower,
        }
    }

    /// Test if no value remains
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count remaining values
    pub fn size(&self) -> usize {
        self.bits.count_ones()
    }

    /// The value of a singleton domain
    pub fn value(&self) -> Option<i64> {
        (self.size() == 1).then(|| self.min()).flatten()
    }

    /// Smallest remaining value
    pub fn min(&self) -> Option<i64> {
        self.bits.first_one().map(|slot| self.lower + slot as i64)
    }

    /// Largest remaining value
    pub fn max(&self) -> Option<i64> {
        self.bits.last_one().map(|slot| self.lower + slot as i64)
    }

    /// Remaining values in ascending order
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.bits
            .iter_ones()
            .map(move |slot| self.lower + slot as i64)
    }

    /// Remaining values as a vector
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

impl fmt::Display for HeightDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeightDomain({:?})", self.to_vec())
    }
}
