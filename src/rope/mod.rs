//! A UTF-8 text rope built on top of a [`Tree`](crate::tree::Tree) of
//! chunks, with views over its bytes, UTF-16 code units, scalars and
//! extended grapheme clusters.

mod chunk;
mod compare;
mod graphemes;
mod index;
pub(crate) mod iterators;
mod metrics;
mod rope;
mod rope_builder;
#[cfg(feature = "serde")]
mod serde_impls;
mod utils;
mod views;

pub use index::Index;
pub use rope::Rope;
pub use rope_builder::RopeBuilder;
pub use views::{
    Character,
    Granularity,
    Scalar,
    SubView,
    Utf16Unit,
    Utf8Unit,
    View,
};

/// A view of a [`Rope`] as a sequence of bytes.
pub type Utf8View<'a> = View<'a, Utf8Unit>;

/// A view of a [`Rope`] as a sequence of UTF-16 code units.
pub type Utf16View<'a> = View<'a, Utf16Unit>;

/// A view of a [`Rope`] as a sequence of `char`s.
pub type ScalarView<'a> = View<'a, Scalar>;

/// A view of a [`Rope`] as a sequence of extended grapheme clusters.
pub type CharacterView<'a> = View<'a, Character>;

/// A view of a range of a [`Rope`] as a sequence of bytes.
pub type Utf8SubView = SubView<Utf8Unit>;

/// A view of a range of a [`Rope`] as a sequence of UTF-16 code units.
pub type Utf16SubView = SubView<Utf16Unit>;

/// A view of a range of a [`Rope`] as a sequence of `char`s.
pub type ScalarSubView = SubView<Scalar>;

/// A view of a range of a [`Rope`] as a sequence of extended grapheme clusters.
pub type CharacterSubView = SubView<Character>;
