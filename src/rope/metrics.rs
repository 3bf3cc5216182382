use core::ops::{Add, AddAssign, Sub, SubAssign};

use super::chunk::ChunkSummary;
use crate::tree::Metric;

macro_rules! summary_metric {
    ($(#[$attr:meta])* $name:ident, $field:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
        pub(super) struct $name(pub(super) usize);

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, other: Self) -> Self {
                Self(self.0 + other.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, other: Self) -> Self {
                Self(self.0 - other.0)
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, other: Self) {
                self.0 += other.0
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, other: Self) {
                self.0 -= other.0
            }
        }

        impl Metric<ChunkSummary> for $name {
            #[inline]
            fn zero() -> Self {
                Self(0)
            }

            #[inline]
            fn measure(summary: &ChunkSummary) -> Self {
                Self(summary.$field)
            }
        }
    };
}

summary_metric!(
    /// A metric counting UTF-8 code units.
    ByteMetric,
    bytes
);

summary_metric!(
    /// A metric counting UTF-16 code units.
    Utf16Metric,
    utf16_units
);

summary_metric!(
    /// A metric counting Unicode scalar values.
    ScalarMetric,
    scalars
);

summary_metric!(
    /// A metric counting grapheme cluster starts.
    CharacterMetric,
    characters
);
