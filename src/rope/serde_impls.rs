use core::fmt;

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::{Rope, RopeBuilder};

/// A rope is serialized as the sequence of its chunks.
impl Serialize for Rope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.is_empty() { 0 } else { self.tree.leaf_count() };

        let mut seq = serializer.serialize_seq(Some(len))?;

        for chunk in self.chunks() {
            seq.serialize_element(chunk)?;
        }

        seq.end()
    }
}

/// A rope is deserialized from a sequence of strings, which are
/// concatenated. Human-readable formats may also hand it a single string.
impl<'de> Deserialize<'de> for Rope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Binary formats usually can't describe what comes next.
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(RopeVisitor)
        } else {
            deserializer.deserialize_seq(RopeVisitor)
        }
    }
}

struct RopeVisitor;

impl<'de> Visitor<'de> for RopeVisitor {
    type Value = Rope;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or a sequence of strings")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut builder = RopeBuilder::new();

        while let Some(text) = seq.next_element::<String>()? {
            builder.append(text);
        }

        Ok(builder.build())
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Rope::from(s))
    }
}
