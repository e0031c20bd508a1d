/// Creates a [`Set`](crate::Set) from a list of values, skipping duplicates.
///
/// The first occurrence of each value keeps its position.
///
/// ```
/// use blobset_typed::{Set, set};
///
/// let s: Set<char> = set!['a', 'b', 'a', 'c'];
/// assert_eq!(s.as_slice(), &['a', 'b', 'c']);
///
/// let empty: Set<u8> = set![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! set {
    () => {
        $crate::Set::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut set = $crate::Set::new();
        $( set.add($value); )+
        set
    }};
}
