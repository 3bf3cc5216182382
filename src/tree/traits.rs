use core::fmt::Debug;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// The metadata cached in every node of a [`Tree`](super::Tree).
///
/// The summary of an internal node is the sum of the summaries of its
/// children, so summaries have to form a commutative monoid under addition
/// with [`Default::default()`] as the identity element.
pub trait Summary:
    Debug
    + Copy
    + Default
    + PartialEq
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
{
}

pub trait Leaf: Debug + Clone {
    type Summary: Summary;

    fn summarize(&self) -> Self::Summary;

    /// Returns whether the leaf is too small to be on its own and should
    /// be rebalanced with one of its siblings.
    fn is_underfilled(&self) -> bool;

    /// Balances two adjacent leaves, at least one of which is underfilled.
    ///
    /// Returns `true` if the contents of `right` have been moved into
    /// `left`, in which case `right` is left empty and should be dropped.
    fn balance_leaves(left: &mut Self, right: &mut Self) -> bool;
}

pub trait Metric<S: Summary>:
    Debug
    + Copy
    + Ord
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
{
    /// The identity element of this metric with respect to addition.
    ///
    /// Given an implementor `M` of this trait, for all instances `m` of `M`
    /// it should hold `m == m + M::zero()`.
    fn zero() -> Self;

    /// Returns the measure of the summary according to this metric.
    fn measure(summary: &S) -> Self;
}
