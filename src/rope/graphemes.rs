use unicode_segmentation::UnicodeSegmentation;

use super::chunk::Breaks;

/// Computes the grapheme cluster starts of a sequence of chunks, fed to it
/// one at a time from left to right.
///
/// Extended grapheme cluster segmentation can restart from any cluster
/// start, so the only state that has to be carried from one chunk to the
/// next is the text of the last, possibly unfinished, cluster.
#[derive(Clone, Debug, Default)]
pub(super) struct BreakScanner {
    /// The text of the last cluster seen so far, or empty if nothing has
    /// been scanned yet.
    carry: String,
}

impl BreakScanner {
    /// Creates a scanner resuming after text that ended with the given
    /// (possibly unfinished) cluster.
    #[inline]
    pub(super) fn with_carry(carry: String) -> Self {
        Self { carry }
    }

    /// Scans the next chunk, returning its cluster starts relative to the
    /// start of the chunk.
    pub(super) fn scan(&mut self, text: &str) -> Breaks {
        let carried = self.carry.len();

        self.carry.push_str(text);

        let mut breaks = Breaks::default();
        let mut last_start = 0;

        for (idx, _) in self.carry.grapheme_indices(true) {
            last_start = idx;

            // Starts inside the carried text have already been reported.
            if idx >= carried {
                breaks.push(idx - carried);
            }
        }

        self.carry.drain(..last_start);

        breaks
    }
}
