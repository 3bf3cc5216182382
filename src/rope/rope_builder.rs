use super::chunk::Chunk;
use super::graphemes::BreakScanner;
use super::rope::{FANOUT, Rope};
use super::utils::floor_char_boundary;
use crate::tree::TreeBuilder;

/// An incremental [`Rope`](crate::Rope) builder.
///
/// Appending never rescans text that has already been turned into chunks,
/// so building a rope from many small pieces is linear in the total length.
#[derive(Clone, Debug, Default)]
pub struct RopeBuilder {
    tree_builder: TreeBuilder<FANOUT, Chunk>,

    /// Text not yet turned into a chunk, never longer than the maximum
    /// chunk size.
    buffer: String,

    scanner: BreakScanner,
}

impl RopeBuilder {
    /// Appends `text` to the end of the `Rope` being built.
    #[inline]
    pub fn append<T>(&mut self, text: T) -> &mut Self
    where
        T: AsRef<str>,
    {
        let mut text = text.as_ref();

        while !text.is_empty() {
            let room = Chunk::max_bytes() - self.buffer.len();

            let mut split = floor_char_boundary(text, room);

            // A char that doesn't fit in an empty buffer can't fit anywhere.
            if split == 0 && self.buffer.is_empty() {
                split = text.chars().next().map_or(0, char::len_utf8);
            }

            let (head, rest) = text.split_at(split);
            self.buffer.push_str(head);
            text = rest;

            if !text.is_empty() {
                self.flush();
            }
        }

        self
    }

    /// Completes the build, consuming the `RopeBuilder` and returning the
    /// `Rope`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::{Rope, RopeBuilder};
    /// #
    /// let mut builder = RopeBuilder::new();
    ///
    /// builder.append("ƒoo\n").append("bär\r\n").append("baz");
    ///
    /// let rope: Rope = builder.build();
    ///
    /// assert_eq!(rope, "ƒoo\nbär\r\nbaz");
    /// ```
    #[inline]
    pub fn build(mut self) -> Rope {
        if !self.buffer.is_empty() {
            self.flush();
        }

        Rope::from_tree(self.tree_builder.build())
    }

    #[inline]
    fn flush(&mut self) {
        let breaks = self.scanner.scan(&self.buffer);
        let chunk = Chunk::new(&self.buffer, breaks);
        self.tree_builder.push_leaf(chunk);
        self.buffer.clear();
    }

    /// Creates a new `RopeBuilder`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let r = RopeBuilder::new().build();
        r.assert_invariants();
        assert!(r.is_empty());
    }

    #[test]
    fn many_small_pieces() {
        let pieces = ["e", "\u{301}", "🐕", "\u{200d}", "🦺", "\r", "\n", "x"];

        let mut builder = RopeBuilder::new();
        let mut text = String::new();

        for i in 0..200 {
            let piece = pieces[i % pieces.len()];
            builder.append(piece);
            text.push_str(piece);
        }

        let r = builder.build();
        r.assert_invariants();

        let whole = Rope::from(text.as_str());
        assert!(r.utf8_eq(&whole));
        assert_eq!(r.character_len(), whole.character_len());
    }

    #[test]
    fn pieces_longer_than_a_chunk() {
        let text = "🗻∈🌏 ".repeat(100);

        let mut builder = RopeBuilder::new();
        builder.append(&text[..7]).append(&text[7..]).append("");

        let r = builder.build();
        r.assert_invariants();
        assert_eq!(String::from(&r), text);
    }
}
