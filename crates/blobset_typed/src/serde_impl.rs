use core::fmt;
use core::marker::PhantomData;

use serde_core::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde_core::ser::{Serialize, Serializer};

use crate::Set;

// -----------------------------------------------------------------------------
// Serialize

impl<T: Copy + Serialize> Serialize for Set<T> {
    /// Serializes the items as a sequence, in order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct SetVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for SetVisitor<T>
where
    T: Copy + PartialEq + Deserialize<'de>,
{
    type Value = Set<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        // Untrusted hints must not trigger huge allocations.
        const MAX_PREALLOC: usize = 4096;

        let mut set = Set::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(value) = seq.next_element()? {
            set.add(value);
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for Set<T>
where
    T: Copy + PartialEq + Deserialize<'de>,
{
    /// Deserializes a sequence, skipping repeated items.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SetVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Set, set};
    use alloc::string::String;

    #[test]
    fn json_sequence() {
        let s: Set<i64> = set![4, -2, 9];
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[4,-2,9]");

        let back: Set<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn repeated_items_are_skipped() {
        let s: Set<char> = serde_json::from_str(r#"["x","y","x","z","y"]"#).unwrap();
        assert_eq!(s.as_slice(), &['x', 'y', 'z']);
    }

    #[test]
    fn nested_in_derived_struct() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Layer {
            name: String,
            ids: Set<u16>,
        }

        let layer = Layer {
            name: String::from("ground"),
            ids: set![3, 1],
        };
        let json = serde_json::to_string(&layer).unwrap();
        assert_eq!(json, r#"{"name":"ground","ids":[3,1]}"#);
        assert_eq!(serde_json::from_str::<Layer>(&json).unwrap(), layer);
    }
}
