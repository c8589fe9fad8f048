//! Exact arithmetic in the quadratic field Q(√D)
//!
//! Elements are `a + b√D` with arbitrary-precision rational coefficients, so
//! repeated division by the golden ratio never accumulates rounding error.
//! Division is only exposed through fallible methods: the reciprocal of an
//! element with zero norm fails with [`AlgorithmError::DivisionByZero`]
//! instead of producing NaN or infinity.

use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Element `rational + irrational * √D` of the field Q(√D)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quadratic<const D: i64> {
    rational: BigRational,
    irrational: BigRational,
}

/// The field Q(√5) containing the golden ratio
pub type GoldenField = Quadratic<5>;

fn integer(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

fn fraction(numerator: i64, denominator: i64) -> Result<BigRational> {
    if denominator == 0 {
        return Err(AlgorithmError::DivisionByZero {
            operation: "fraction construction",
        });
    }
    Ok(BigRational::new(
        BigInt::from(numerator),
        BigInt::from(denominator),
    ))
}

fn ratio_to_f64(value: &BigRational) -> f64 {
    let numerator = value.numer().to_f64().unwrap_or(f64::NAN);
    let denominator = value.denom().to_f64().unwrap_or(f64::NAN);
    numerator / denominator
}

impl<const D: i64> Quadratic<D> {
    /// The integer whose square root is adjoined
    pub const RADICAND: i64 = D;

    /// Create an element from its two rational coefficients
    pub const fn new(rational: BigRational, irrational: BigRational) -> Self {
        Self {
            rational,
            irrational,
        }
    }

    /// Create `a + b√D` from integer coefficients
    pub fn from_integers(rational: i64, irrational: i64) -> Self {
        Self::new(integer(rational), integer(irrational))
    }

    /// Create `n1/d1 + (n2/d2)√D`
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::DivisionByZero`] if either denominator is zero
    pub fn from_fractions(rational: (i64, i64), irrational: (i64, i64)) -> Result<Self> {
        Ok(Self::new(
            fraction(rational.0, rational.1)?,
            fraction(irrational.0, irrational.1)?,
        ))
    }

    /// Exact rational image of a finite float
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is NaN or infinite
    pub fn from_f64(value: f64) -> Result<Self> {
        BigRational::from_float(value)
            .map(|rational| Self::new(rational, BigRational::zero()))
            .ok_or_else(|| invalid_parameter("value", &value, &"must be a finite number"))
    }

    /// The adjoined root √D itself
    pub fn root() -> Self {
        Self::from_integers(0, 1)
    }

    /// Rational coefficient `a`
    pub const fn rational(&self) -> &BigRational {
        &self.rational
    }

    /// Coefficient `b` of √D
    pub const fn irrational(&self) -> &BigRational {
        &self.irrational
    }

    /// Galois conjugate `a - b√D`
    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self::new(self.rational.clone(), -self.irrational.clone())
    }

    /// Field norm `a² - D b²`
    pub fn norm(&self) -> BigRational {
        &self.rational * &self.rational - &self.irrational * &self.irrational * integer(D)
    }

    /// Multiplicative inverse `(a - b√D) / (a² - D b²)`
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::DivisionByZero`] if the norm is zero
    pub fn reciprocal(&self) -> Result<Self> {
        let norm = self.norm();
        if norm.is_zero() {
            return Err(AlgorithmError::DivisionByZero {
                operation: "reciprocal",
            });
        }
        Ok(Self::new(
            &self.rational / &norm,
            -(&self.irrational / &norm),
        ))
    }

    /// Exact quotient `self / rhs`
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::DivisionByZero`] if `rhs` has zero norm
    pub fn checked_div(&self, rhs: &Self) -> Result<Self> {
        Ok(self * &rhs.reciprocal()?)
    }

    /// Nearest float, for rendering
    pub fn to_f64(&self) -> f64 {
        (D as f64)
            .sqrt()
            .mul_add(ratio_to_f64(&self.irrational), ratio_to_f64(&self.rational))
    }
}

impl Quadratic<5> {
    /// The golden ratio `(1 + √5) / 2`
    pub fn golden_ratio() -> Self {
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        Self::new(half.clone(), half)
    }
}

impl<const D: i64> fmt::Display for Quadratic<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.irrational.is_zero() {
            write!(f, "{}", self.rational)
        } else if self.rational.is_zero() {
            write!(f, "{}√{D}", self.irrational)
        } else {
            write!(f, "({} + {}√{D})", self.rational, self.irrational)
        }
    }
}

impl<const D: i64> Add for Quadratic<D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.rational + rhs.rational,
            self.irrational + rhs.irrational,
        )
    }
}

impl<'a, 'b, const D: i64> Add<&'b Quadratic<D>> for &'a Quadratic<D> {
    type Output = Quadratic<D>;

    fn add(self, rhs: &'b Quadratic<D>) -> Quadratic<D> {
        Quadratic::new(
            &self.rational + &rhs.rational,
            &self.irrational + &rhs.irrational,
        )
    }
}

impl<const D: i64> Sub for Quadratic<D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.rational - rhs.rational,
            self.irrational - rhs.irrational,
        )
    }
}

impl<'a, 'b, const D: i64> Sub<&'b Quadratic<D>> for &'a Quadratic<D> {
    type Output = Quadratic<D>;

    fn sub(self, rhs: &'b Quadratic<D>) -> Quadratic<D> {
        Quadratic::new(
            &self.rational - &rhs.rational,
            &self.irrational - &rhs.irrational,
        )
    }
}

impl<'a, 'b, const D: i64> Mul<&'b Quadratic<D>> for &'a Quadratic<D> {
    type Output = Quadratic<D>;

    // (a + b√D)(c + e√D) = (ac + be·D) + (ae + bc)√D
    fn mul(self, rhs: &'b Quadratic<D>) -> Quadratic<D> {
        let rational =
            &self.rational * &rhs.rational + &self.irrational * &rhs.irrational * integer(D);
        let irrational = &self.rational * &rhs.irrational + &self.irrational * &rhs.rational;
        Quadratic::new(rational, irrational)
    }
}

impl<const D: i64> Mul for Quadratic<D> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<const D: i64> Neg for Quadratic<D> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.rational, -self.irrational)
    }
}

impl<const D: i64> Neg for &Quadratic<D> {
    type Output = Quadratic<D>;

    fn neg(self) -> Quadratic<D> {
        Quadratic::new(-self.rational.clone(), -self.irrational.clone())
    }
}

impl<const D: i64> Zero for Quadratic<D> {
    fn zero() -> Self {
        Self::new(BigRational::zero(), BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.rational.is_zero() && self.irrational.is_zero()
    }
}

impl<const D: i64> One for Quadratic<D> {
    fn one() -> Self {
        Self::new(BigRational::one(), BigRational::zero())
    }
}
