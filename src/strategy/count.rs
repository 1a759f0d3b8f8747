//! Tree counting, fixed width with clamping or arbitrary precision.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Mul};

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::Strategy;
use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::sets::BipartitionEnumerator;

/// Number of rooted binary trees on `leaves` labelled leaves,
/// `∏_{i=3}^{leaves+1} (2i - 5)`. Equals the number of unrooted trees on
/// `leaves + 1` leaves; 1 for two leaves or fewer.
pub fn count_unrooted_trees<T>(leaves: usize) -> T
where
    T: One + From<u64>,
{
    (3..=leaves as u64 + 1).fold(T::one(), |acc, i| acc * T::from(2 * i - 5))
}

/// `u64` that saturates at `u64::MAX` and remembers that it did.
///
/// A clamped value is a lower bound on the true count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClampedU64 {
    value: u64,
    clamped: bool,
}

impl ClampedU64 {
    const SATURATED: Self = Self {
        value: u64::MAX,
        clamped: true,
    };

    /// Exact value.
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            clamped: false,
        }
    }

    /// Stored value, `u64::MAX` once clamped.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether an overflow happened on the way to this value.
    pub fn is_clamped(&self) -> bool {
        self.clamped
    }
}

impl From<u64> for ClampedU64 {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl Add for ClampedU64 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if self.clamped || rhs.clamped {
            return Self::SATURATED;
        }
        self.value
            .checked_add(rhs.value)
            .map_or(Self::SATURATED, Self::new)
    }
}

impl Mul for ClampedU64 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.value == 0 || rhs.value == 0 {
            return Self::new(0);
        }
        if self.clamped || rhs.clamped {
            return Self::SATURATED;
        }
        self.value
            .checked_mul(rhs.value)
            .map_or(Self::SATURATED, Self::new)
    }
}

impl Zero for ClampedU64 {
    fn zero() -> Self {
        Self::new(0)
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl One for ClampedU64 {
    fn one() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for ClampedU64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clamped {
            write!(f, ">= {}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Number types a [`CountStrategy`] may count in: ones that never wrap or
/// panic on overflow.
pub trait TreeCount: Clone + Send + Zero + One + From<u64> {}

impl TreeCount for ClampedU64 {}

impl TreeCount for BigUint {}

/// Counts the trees on the terrace in `T`.
#[derive(Debug, Clone)]
pub struct CountStrategy<T> {
    _value: PhantomData<T>,
}

impl<T> CountStrategy<T> {
    /// New counter.
    pub fn new() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<T> Default for CountStrategy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeCount> Strategy for CountStrategy<T> {
    type Output = T;

    fn base_one_leaf(&mut self, _leaf: usize) -> T {
        T::one()
    }

    fn base_two_leaves(&mut self, _first: usize, _second: usize) -> T {
        T::one()
    }

    fn base_unconstrained(&mut self, leaves: &RankedBitSet) -> T {
        count_unrooted_trees(leaves.count())
    }

    fn begin_iteration(
        &mut self,
        _bips: &BipartitionEnumerator<'_>,
        _active: &BitSet,
        _constraints: &[Constraint],
    ) -> T {
        T::zero()
    }

    fn combine(&mut self, left: T, right: T) -> T {
        left * right
    }

    fn accumulate(&mut self, acc: T, value: T) -> T {
        acc + value
    }

    fn fork(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 1)]
    #[test_case(1, 1)]
    #[test_case(2, 1)]
    #[test_case(3, 3)]
    #[test_case(4, 15)]
    #[test_case(5, 105)]
    #[test_case(6, 945)]
    #[test_case(7, 10395)]
    fn rooted_tree_counts(leaves: usize, expected: u64) {
        assert_eq!(count_unrooted_trees::<u64>(leaves), expected);
        assert_eq!(
            count_unrooted_trees::<BigUint>(leaves),
            BigUint::from(expected)
        );
    }

    #[test]
    fn exact_arithmetic_below_the_limit() {
        let a = ClampedU64::new(10);
        let b = ClampedU64::new(417);
        assert_eq!((a + b).value(), 427);
        assert_eq!((a * b).value(), 4170);
        assert!(!(a * b).is_clamped());
    }

    #[test]
    fn overflow_clamps_and_sticks() {
        let max = ClampedU64::new(u64::MAX);
        let sum = max + ClampedU64::new(1);
        assert!(sum.is_clamped());
        assert_eq!(sum.value(), u64::MAX);

        let product = ClampedU64::new(u64::MAX / 2) * ClampedU64::new(3);
        assert!(product.is_clamped());
        assert_eq!(product.value(), u64::MAX);

        assert!((product + ClampedU64::new(0)).is_clamped());
        assert!((product * ClampedU64::new(1)).is_clamped());
    }

    #[test]
    fn zero_annihilates_a_clamped_factor() {
        let clamped = ClampedU64::new(u64::MAX) * ClampedU64::new(2);
        let product = clamped * ClampedU64::new(0);
        assert_eq!(product, ClampedU64::new(0));
        assert!(!product.is_clamped());
    }

    #[test]
    fn large_unconstrained_counts_clamp() {
        let clamped: ClampedU64 = count_unrooted_trees(40);
        assert!(clamped.is_clamped());
        let exact: BigUint = count_unrooted_trees(40);
        assert!(exact > BigUint::from(u64::MAX));
    }

    #[test]
    fn display_marks_lower_bounds() {
        assert_eq!(ClampedU64::new(15).to_string(), "15");
        let clamped = ClampedU64::new(u64::MAX) + ClampedU64::new(1);
        assert_eq!(clamped.to_string(), format!(">= {}", u64::MAX));
    }
}
