use super::Leaf;

#[derive(Clone, Default)]
pub(super) struct Lnode<L: Leaf> {
    value: L,
    summary: L::Summary,
}

impl<L: Leaf> core::fmt::Debug for Lnode<L> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            f.debug_struct("Lnode")
                .field("value", &self.value)
                .field("summary", &self.summary)
                .finish()
        } else {
            write!(f, "{:?} -> {:?}", self.value, self.summary)
        }
    }
}

impl<L: Leaf> From<L> for Lnode<L> {
    #[inline]
    fn from(value: L) -> Self {
        Self { summary: value.summarize(), value }
    }
}

impl<L: Leaf> Lnode<L> {
    pub(super) fn assert_invariants(&self) {
        assert_eq!(
            self.summary,
            self.value.summarize(),
            "The cached summary of {:?} is stale",
            self.value
        );
    }

    #[inline]
    pub(super) fn summary(&self) -> &L::Summary {
        &self.summary
    }

    #[inline]
    pub(super) fn value(&self) -> &L {
        &self.value
    }
}
