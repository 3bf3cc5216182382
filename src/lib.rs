//! bigtext is a persistent UTF-8 text rope that can be navigated in bytes,
//! UTF-16 code units, Unicode scalar values and extended grapheme clusters.
//!
//! A [`Rope`] is a B-tree of text chunks. Cloning it is `O(1)`, and edits
//! only copy the nodes on the path to the edited chunks, sharing everything
//! else with the previous versions of the text.
//!
//! Positions in the text are [`Index`]es, which are the same across all
//! the views of a rope. Every view rounds the indices it's given down to
//! the closest boundary of its granularity, so a position can never end up
//! in the middle of a code point or of a grapheme cluster.
//!
//! # Example usage
//!
//! ```
//! # use bigtext::Rope;
//! #
//! let mut r = Rope::from("Hello, 🐕‍🦺!");
//!
//! assert_eq!(r.byte_len(), 19);
//! assert_eq!(r.utf16_len(), 13);
//! assert_eq!(r.scalar_len(), 11);
//! assert_eq!(r.character_len(), 9);
//!
//! let characters = r.characters();
//! let dog = characters.index_at_offset(7);
//! assert_eq!(characters.get(dog), "🐕‍🦺");
//!
//! // The same index can be used with every other view.
//! assert_eq!(r.utf16().offset_of(dog), 7);
//! assert_eq!(r.utf8().offset_of(characters.index_after(dog)), 18);
//!
//! let snapshot = r.clone();
//! r.insert_at(dog, "good ");
//!
//! assert_eq!(r, "Hello, good 🐕‍🦺!");
//! assert_eq!(snapshot, "Hello, 🐕‍🦺!");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod rope;
mod tree;

pub mod iter {
    //! Iterators over [`Rope`](crate::Rope)s and their views.

    pub use crate::rope::iterators::{
        Bytes,
        Chars,
        Chunks,
        Graphemes,
        Utf16Units,
    };
}

pub use rope::{
    Character,
    CharacterSubView,
    CharacterView,
    Granularity,
    Index,
    Rope,
    RopeBuilder,
    Scalar,
    ScalarSubView,
    ScalarView,
    SubView,
    Utf16SubView,
    Utf16Unit,
    Utf16View,
    Utf8SubView,
    Utf8Unit,
    Utf8View,
    View,
};
