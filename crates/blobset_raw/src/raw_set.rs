use core::alloc::Layout;
use core::num::NonZeroUsize;
use core::slice;

use blobset_ptr::SlotMut;

use crate::SetError;
use crate::blob::{Blob, fits_in_allocation};

// -----------------------------------------------------------------------------
// RawSet

/// A growable, contiguous container of untyped, fixed-width items.
///
/// `RawSet` owns a single allocation holding `capacity` item slots, of which
/// the first `len` are live. Items are kept in positional order without gaps.
///
/// - Appending or inserting into a full set doubles the capacity,
///   starting from `1` for an empty set.
/// - [`reserve`](Self::reserve) grows to an exact capacity.
/// - Nothing ever reduces the capacity.
///
/// Items are opaque: they are moved with raw byte copies and never dropped.
/// Every operation that can grow the set may move the allocation, which the
/// borrow checker enforces by requiring `&mut self`.
#[derive(Debug)]
pub struct RawSet {
    blob: Blob,
    len: usize,
    capacity: usize,
}

// SAFETY: `RawSet` uniquely owns its allocation and holds no thread-local state.
unsafe impl Send for RawSet {}
// SAFETY: shared access only reads.
unsafe impl Sync for RawSet {}

impl Drop for RawSet {
    fn drop(&mut self) {
        // SAFETY: `capacity` is the allocated capacity, items need no drop.
        unsafe { self.blob.dealloc(self.capacity) }
    }
}

impl Clone for RawSet {
    /// Equivalent to [`RawSet::copy`], the clone is size-tight.
    #[inline]
    fn clone(&self) -> Self {
        self.copy()
    }
}

// -----------------------------------------------------------------------------
// Basic methods

impl RawSet {
    /// Creates an empty set of `item_size`-byte items.
    ///
    /// Items are plain byte blocks with an alignment of `1`.
    /// No memory is allocated until the first item is added.
    ///
    /// # Panics
    /// Panics if `item_size` exceeds `isize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let set = RawSet::new(4);
    /// assert_eq!(set.len(), 0);
    /// assert_eq!(set.capacity(), 0);
    /// assert_eq!(set.item_size(), 4);
    /// ```
    #[inline]
    pub const fn new(item_size: usize) -> Self {
        match Layout::from_size_align(item_size, 1) {
            Ok(layout) => Self::with_layout(layout),
            Err(_) => panic!("item size exceeds isize::MAX"),
        }
    }

    /// Creates an empty set whose items follow `item_layout`.
    ///
    /// The layout is padded to a multiple of its alignment, so every item
    /// is aligned for `item_layout` and typed wrappers can read items in
    /// place. [`item_size`](Self::item_size) reports the padded width, and
    /// byte values passed to the checked operations must have that width.
    ///
    /// # Panics
    /// Panics if the padded size exceeds `isize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// # use core::alloc::Layout;
    /// let set = RawSet::with_layout(Layout::from_size_align(3, 4).unwrap());
    /// assert_eq!(set.item_size(), 4);
    /// ```
    #[inline]
    pub const fn with_layout(item_layout: Layout) -> Self {
        let align = item_layout.align();
        let padded = match item_layout.size().checked_add(align - 1) {
            Some(size) => size & !(align - 1),
            None => panic!("item size exceeds isize::MAX"),
        };
        let item_layout = match Layout::from_size_align(padded, align) {
            Ok(layout) => layout,
            Err(_) => panic!("item size exceeds isize::MAX"),
        };

        Self {
            blob: Blob::new(item_layout),
            len: 0,
            capacity: 0,
        }
    }

    /// Returns the number of live items.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no items.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of item slots currently allocated.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the width of a single item in bytes.
    #[inline(always)]
    pub const fn item_size(&self) -> usize {
        self.blob.item_size()
    }

    /// Returns the layout of a single item.
    #[inline(always)]
    pub const fn item_layout(&self) -> Layout {
        self.blob.layout()
    }

    /// Returns the address of the first item.
    ///
    /// The pointer is dangling but aligned when nothing is allocated, and it
    /// is invalidated by any operation that grows the set.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const u8 {
        self.blob.as_ptr()
    }

    /// Returns the mutable address of the first item.
    ///
    /// See [`as_ptr`](Self::as_ptr) for the validity rules.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.blob.as_mut_ptr()
    }
}

// -----------------------------------------------------------------------------
// Byte access

impl RawSet {
    /// Returns the bytes of all live items, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(2);
    /// set.push(&[1, 2]).unwrap();
    /// set.push(&[3, 4]).unwrap();
    /// assert_eq!(set.as_bytes(), &[1, 2, 3, 4]);
    /// ```
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `0..len` items are initialized.
        unsafe { slice::from_raw_parts(self.blob.as_ptr(), self.len * self.item_size()) }
    }

    /// Returns the bytes of the item at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index < self.len {
            // SAFETY: in bounds and initialized.
            Some(unsafe { self.blob.get(index) }.as_bytes())
        } else {
            None
        }
    }

    /// Returns the mutable bytes of the item at `index`, if any.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index < self.len {
            // SAFETY: in bounds and initialized.
            Some(unsafe { self.blob.get_mut(index).assume_init() })
        } else {
            None
        }
    }

    /// Returns the index of the first item byte-equal to `value`.
    ///
    /// This is a linear scan. A `value` of the wrong width matches nothing.
    pub fn position(&self, value: &[u8]) -> Option<usize> {
        if value.len() != self.item_size() {
            return None;
        }
        // SAFETY: `0..len` items are initialized.
        (0..self.len).position(|index| unsafe { self.blob.get(index) }.bytes_eq(value))
    }

    /// Returns `true` if an item byte-equal to `value` is present.
    ///
    /// This is a linear scan. A `value` of the wrong width matches nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(1);
    /// set.push(&[7]).unwrap();
    /// assert!(set.contains(&[7]));
    /// assert!(!set.contains(&[8]));
    /// assert!(!set.contains(&[7, 7]));
    /// ```
    #[inline]
    pub fn contains(&self, value: &[u8]) -> bool {
        self.position(value).is_some()
    }
}

// -----------------------------------------------------------------------------
// Growth

impl RawSet {
    /// Makes room for one more item, doubling the capacity when full.
    #[inline]
    fn reserve_one(&mut self) {
        #[cold]
        #[inline(never)]
        fn grow_full(this: &mut RawSet) {
            let new_capacity = match this.capacity {
                0 => 1,
                capacity => match capacity.checked_mul(2) {
                    Some(doubled) => doubled,
                    None => panic!("capacity overflow"),
                },
            };
            // SAFETY: `new_capacity > capacity`.
            unsafe { this.grow_to(new_capacity) }
        }

        if self.len == self.capacity {
            grow_full(self);
        }
    }

    /// Reallocates to exactly `new_capacity` slots, preserving all items.
    ///
    /// # Safety
    /// - `new_capacity` must be greater than the current capacity
    unsafe fn grow_to(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > self.capacity);

        log::trace!(
            "RawSet grows from {} to {} slots of {} bytes",
            self.capacity,
            new_capacity,
            self.item_size(),
        );

        unsafe {
            let new = NonZeroUsize::new_unchecked(new_capacity);
            match NonZeroUsize::new(self.capacity) {
                Some(current) => self.blob.realloc(current, new),
                None => self.blob.alloc(new),
            }
        }
        self.capacity = new_capacity;
    }

    /// Grows the capacity to exactly `min_capacity` slots.
    ///
    /// Does nothing if the capacity is already `min_capacity` or more.
    /// Unlike growth from appending, no doubling is applied.
    ///
    /// # Panics
    /// Panics if the requested storage exceeds `isize::MAX` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(8);
    /// set.reserve(5);
    /// assert_eq!(set.capacity(), 5);
    ///
    /// set.reserve(3);
    /// assert_eq!(set.capacity(), 5);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        if self.capacity >= min_capacity {
            return;
        }
        if !fits_in_allocation(self.item_layout(), min_capacity) {
            log::warn!(
                "RawSet reserve of {} slots of {} bytes overflows the allocation size",
                min_capacity,
                self.item_size(),
            );
        }
        // SAFETY: `min_capacity > capacity`.
        unsafe { self.grow_to(min_capacity) }
    }
}

// -----------------------------------------------------------------------------
// Unchecked positional operations

impl RawSet {
    /// Appends an uninitialized slot at the end and returns it.
    ///
    /// The slot is already counted in [`len`](Self::len).
    ///
    /// # Safety
    /// - Every byte of the returned slot must be written before the set is
    ///   read through its byte accessors
    /// - Items written through typed pointers must match the item layout
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(2);
    /// unsafe { set.append_slot() }.copy_from(&[5, 6]);
    /// assert_eq!(set.get(0), Some(&[5, 6][..]));
    /// ```
    #[inline]
    pub unsafe fn append_slot(&mut self) -> SlotMut<'_> {
        self.reserve_one();
        let index = self.len;
        self.len += 1;
        // SAFETY: `index < capacity` after `reserve_one`.
        unsafe { self.blob.get_mut(index) }
    }

    /// Opens a slot at `index` by moving the trailing items one place
    /// to the right, and returns it.
    ///
    /// The slot is already counted in [`len`](Self::len). It still holds the
    /// stale bytes of the item that was moved out of it.
    ///
    /// # Safety
    /// - `index` must be `<= len`
    /// - The same requirements on the slot as [`append_slot`](Self::append_slot)
    pub unsafe fn insert_slot(&mut self, index: usize) -> SlotMut<'_> {
        debug_assert!(index <= self.len, "insertion index out of bounds");

        self.reserve_one();
        let tail = self.len - index;
        // SAFETY: `len + 1 <= capacity` after `reserve_one`.
        unsafe { self.blob.shift(index, index + 1, tail) };
        self.len += 1;
        // SAFETY: `index < len <= capacity`.
        unsafe { self.blob.get_mut(index) }
    }

    /// Removes `count` items starting at `start`, moving the trailing
    /// items left. The capacity is unchanged.
    ///
    /// # Safety
    /// - `start + count` must be `<= len`
    pub unsafe fn erase_unchecked(&mut self, start: usize, count: usize) {
        debug_assert!(
            start.checked_add(count).is_some_and(|end| end <= self.len),
            "erase range out of bounds",
        );

        let end = start + count;
        // SAFETY: `end..len` are initialized and within capacity.
        unsafe { self.blob.shift(end, start, self.len - end) };
        self.len -= count;
    }

    /// Removes the item at `index`, moving the trailing items left.
    ///
    /// # Safety
    /// - `index` must be `< len`
    #[inline]
    pub unsafe fn remove_unchecked(&mut self, index: usize) {
        unsafe { self.erase_unchecked(index, 1) }
    }

    /// Forgets the last item. The vacated slot is not cleared.
    ///
    /// # Safety
    /// - The set must not be empty
    #[inline]
    pub unsafe fn pop_unchecked(&mut self) {
        debug_assert!(self.len > 0, "pop from an empty set");
        self.len -= 1;
    }
}

// -----------------------------------------------------------------------------
// Checked positional operations

impl RawSet {
    #[inline]
    fn check_size(&self, value: &[u8]) -> Result<(), SetError> {
        if value.len() == self.item_size() {
            Ok(())
        } else {
            Err(SetError::SizeMismatch {
                expected: self.item_size(),
                found: value.len(),
            })
        }
    }

    #[inline]
    fn check_insert_index(&self, index: usize) -> Result<(), SetError> {
        if index <= self.len {
            Ok(())
        } else {
            Err(SetError::IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    /// Appends a copy of `value` at the end.
    pub fn push(&mut self, value: &[u8]) -> Result<(), SetError> {
        self.check_size(value)?;
        // SAFETY: the slot is fully written.
        unsafe { self.append_slot() }.copy_from(value);
        Ok(())
    }

    /// Inserts a copy of `value` at `index`, moving the trailing items right.
    ///
    /// `index == len` appends.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::{RawSet, SetError};
    /// let mut set = RawSet::new(1);
    /// set.push(&[1]).unwrap();
    /// set.insert(0, &[0]).unwrap();
    /// assert_eq!(set.as_bytes(), &[0, 1]);
    ///
    /// assert_eq!(
    ///     set.insert(3, &[9]),
    ///     Err(SetError::IndexOutOfBounds { index: 3, len: 2 }),
    /// );
    /// ```
    pub fn insert(&mut self, index: usize, value: &[u8]) -> Result<(), SetError> {
        self.check_size(value)?;
        self.check_insert_index(index)?;
        // SAFETY: `index <= len`, the slot is fully written.
        unsafe { self.insert_slot(index) }.copy_from(value);
        Ok(())
    }

    /// Appends `value` unless a byte-equal item is already present.
    ///
    /// Returns `Ok(true)` if the value was added.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(1);
    /// assert_eq!(set.add(&[3]), Ok(true));
    /// assert_eq!(set.add(&[3]), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, value: &[u8]) -> Result<bool, SetError> {
        self.check_size(value)?;
        if self.contains(value) {
            return Ok(false);
        }
        // SAFETY: the slot is fully written.
        unsafe { self.append_slot() }.copy_from(value);
        Ok(true)
    }

    /// Inserts `value` at `index` unless a byte-equal item is already present.
    ///
    /// Returns `Ok(true)` if the value was inserted. The index is validated
    /// even when the value is a duplicate.
    pub fn insert_unique(&mut self, index: usize, value: &[u8]) -> Result<bool, SetError> {
        self.check_size(value)?;
        self.check_insert_index(index)?;
        if self.contains(value) {
            return Ok(false);
        }
        // SAFETY: `index <= len`, the slot is fully written.
        unsafe { self.insert_slot(index) }.copy_from(value);
        Ok(true)
    }

    /// Removes `count` items starting at `start`.
    pub fn erase(&mut self, start: usize, count: usize) -> Result<(), SetError> {
        match start.checked_add(count) {
            Some(end) if end <= self.len => {
                // SAFETY: range checked above.
                unsafe { self.erase_unchecked(start, count) };
                Ok(())
            }
            _ => Err(SetError::RangeOutOfBounds {
                start,
                count,
                len: self.len,
            }),
        }
    }

    /// Removes the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), SetError> {
        if index < self.len {
            // SAFETY: index checked above.
            unsafe { self.remove_unchecked(index) };
            Ok(())
        } else {
            Err(SetError::IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    /// Removes the last item.
    pub fn pop(&mut self) -> Result<(), SetError> {
        if self.len == 0 {
            return Err(SetError::Empty);
        }
        // SAFETY: not empty.
        unsafe { self.pop_unchecked() };
        Ok(())
    }

    /// Removes all items. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Creates an independent copy whose capacity equals the current length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_raw::RawSet;
    /// let mut set = RawSet::new(1);
    /// set.reserve(8);
    /// set.push(&[1]).unwrap();
    ///
    /// let copy = set.copy();
    /// assert_eq!(copy.capacity(), 1);
    /// assert_eq!(copy.as_bytes(), set.as_bytes());
    /// ```
    pub fn copy(&self) -> Self {
        let mut copy = Self::with_layout(self.item_layout());
        if let Some(len) = NonZeroUsize::new(self.len) {
            // SAFETY: the new blob is unallocated, `0..len` are initialized.
            unsafe {
                copy.blob.alloc(len);
                self.blob.copy_to(&mut copy.blob, self.len);
            }
            copy.len = self.len;
            copy.capacity = self.len;
        }
        copy
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::RawSet;
    use crate::SetError;
    use alloc::vec::Vec;

    fn from_u32s(values: &[u32]) -> RawSet {
        let mut set = RawSet::new(4);
        values
            .iter()
            .for_each(|v| set.push(&v.to_ne_bytes()).unwrap());
        set
    }

    fn to_u32s(set: &RawSet) -> Vec<u32> {
        set.as_bytes()
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes(c.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn is_sync_send() {
        use core::panic::{RefUnwindSafe, UnwindSafe};

        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}
        fn is_unwindsafe<T: UnwindSafe>() {}
        fn is_refunwindsafe<T: RefUnwindSafe>() {}

        is_send::<RawSet>();
        is_sync::<RawSet>();
        is_unwindsafe::<RawSet>();
        is_refunwindsafe::<RawSet>();
    }

    #[test]
    fn walkthrough() {
        let mut set = from_u32s(&[1, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.capacity(), 4);
        assert_eq!(to_u32s(&set), [1, 2, 3]);

        set.insert(1, &9u32.to_ne_bytes()).unwrap();
        assert_eq!(to_u32s(&set), [1, 9, 2, 3]);
        assert_eq!(set.len(), 4);

        set.remove(0).unwrap();
        assert_eq!(to_u32s(&set), [9, 2, 3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn doubling() {
        let mut set = RawSet::new(3);
        let mut seen = Vec::new();
        for i in 0..20u8 {
            set.push(&[i, i, i]).unwrap();
            if seen.last() != Some(&set.capacity()) {
                seen.push(set.capacity());
            }
            assert!(set.capacity() >= set.len());
        }
        assert_eq!(seen, [1, 2, 4, 8, 16, 32]);
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn reserve_sets_exact_floor() {
        let mut set = from_u32s(&[1, 2, 3]);
        set.reserve(2);
        assert_eq!(set.capacity(), 4);

        set.reserve(5);
        assert_eq!(set.capacity(), 5);
        assert_eq!(to_u32s(&set), [1, 2, 3]);

        set.push(&4u32.to_ne_bytes()).unwrap();
        set.push(&5u32.to_ne_bytes()).unwrap();
        assert_eq!(set.capacity(), 5);
        set.push(&6u32.to_ne_bytes()).unwrap();
        assert_eq!(set.capacity(), 10);
        assert_eq!(to_u32s(&set), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn insert_at_every_position() {
        let base = [10u32, 20, 30, 40];
        for pos in 0..=base.len() {
            let mut set = from_u32s(&base);
            set.insert(pos, &99u32.to_ne_bytes()).unwrap();

            let mut expected = base.to_vec();
            expected.insert(pos, 99);
            assert_eq!(to_u32s(&set), expected, "insert at {pos}");
        }
    }

    #[test]
    fn remove_at_every_position() {
        let base = [10u32, 20, 30, 40];
        for pos in 0..base.len() {
            let mut set = from_u32s(&base);
            set.remove(pos).unwrap();

            let mut expected = base.to_vec();
            expected.remove(pos);
            assert_eq!(to_u32s(&set), expected, "remove at {pos}");
            assert_eq!(set.capacity(), 4);
        }
    }

    #[test]
    fn erase_ranges_compose() {
        let base: Vec<u32> = (0..10).collect();

        let mut split = from_u32s(&base);
        split.erase(6, 3).unwrap();
        split.erase(1, 2).unwrap();

        let mut direct = from_u32s(&base);
        direct.erase(1, 2).unwrap();
        direct.erase(4, 3).unwrap();

        assert_eq!(to_u32s(&split), [0, 3, 4, 5, 9]);
        assert_eq!(to_u32s(&split), to_u32s(&direct));

        split.erase(5, 0).unwrap();
        assert_eq!(split.len(), 5);
        split.erase(0, 5).unwrap();
        assert!(split.is_empty());
        assert_eq!(split.capacity(), 16);
    }

    #[test]
    fn copy_is_tight_and_independent() {
        let mut set = from_u32s(&[1, 2, 3]);
        let mut copy = set.copy();
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.capacity(), 3);
        assert_eq!(to_u32s(&copy), to_u32s(&set));

        set.get_mut(0).unwrap().copy_from_slice(&7u32.to_ne_bytes());
        copy.push(&4u32.to_ne_bytes()).unwrap();
        assert_eq!(to_u32s(&set), [7, 2, 3]);
        assert_eq!(to_u32s(&copy), [1, 2, 3, 4]);

        let empty = RawSet::new(4).clone();
        assert_eq!((empty.len(), empty.capacity()), (0, 0));
    }

    #[test]
    fn duplicate_free() {
        let mut set = from_u32s(&[1, 2]);
        assert_eq!(set.add(&2u32.to_ne_bytes()), Ok(false));
        assert_eq!(to_u32s(&set), [1, 2]);
        assert_eq!(set.add(&3u32.to_ne_bytes()), Ok(true));
        assert_eq!(to_u32s(&set), [1, 2, 3]);

        assert_eq!(set.insert_unique(0, &3u32.to_ne_bytes()), Ok(false));
        assert_eq!(set.insert_unique(1, &5u32.to_ne_bytes()), Ok(true));
        assert_eq!(to_u32s(&set), [1, 5, 2, 3]);
        assert_eq!(set.position(&2u32.to_ne_bytes()), Some(2));

        assert_eq!(
            set.insert_unique(9, &1u32.to_ne_bytes()),
            Err(SetError::IndexOutOfBounds { index: 9, len: 4 }),
        );
    }

    #[test]
    fn contract_violations() {
        let mut set = from_u32s(&[1]);
        assert_eq!(
            set.push(&[1, 2]),
            Err(SetError::SizeMismatch {
                expected: 4,
                found: 2
            }),
        );
        assert_eq!(
            set.remove(1),
            Err(SetError::IndexOutOfBounds { index: 1, len: 1 }),
        );
        assert_eq!(
            set.erase(0, 2),
            Err(SetError::RangeOutOfBounds {
                start: 0,
                count: 2,
                len: 1
            }),
        );
        assert_eq!(
            set.erase(1, usize::MAX),
            Err(SetError::RangeOutOfBounds {
                start: 1,
                count: usize::MAX,
                len: 1
            }),
        );
        assert_eq!(set.pop(), Ok(()));
        assert_eq!(set.pop(), Err(SetError::Empty));
        assert_eq!(set.capacity(), 1);
        assert!(set.get(0).is_none());
    }

    #[test]
    fn unchecked_paths() {
        let mut set = from_u32s(&[1, 2, 3, 4]);
        unsafe {
            set.append_slot().copy_from(&5u32.to_ne_bytes());
            set.insert_slot(0).copy_from(&0u32.to_ne_bytes());
            set.erase_unchecked(1, 2);
            set.remove_unchecked(0);
            set.pop_unchecked();
        }
        assert_eq!(to_u32s(&set), [3, 4]);
        assert_eq!(set.capacity(), 8);
    }

    #[test]
    fn zero_sized_items() {
        let mut set = RawSet::new(0);
        assert_eq!(set.add(&[]), Ok(true));
        assert_eq!(set.add(&[]), Ok(false));
        set.push(&[]).unwrap();
        set.push(&[]).unwrap();
        assert_eq!((set.len(), set.capacity()), (3, 4));
        assert!(set.as_bytes().is_empty());

        let copy = set.copy();
        assert_eq!((copy.len(), copy.capacity()), (3, 3));
    }

    #[test]
    fn unpadded_layout_keeps_items_aligned() {
        use core::alloc::Layout;

        let mut set = RawSet::with_layout(Layout::from_size_align(3, 4).unwrap());
        assert_eq!(set.item_size(), 4);
        assert_eq!(set.item_layout(), Layout::from_size_align(4, 4).unwrap());

        assert_eq!(
            set.push(&[1, 2, 3]),
            Err(SetError::SizeMismatch {
                expected: 4,
                found: 3
            }),
        );
        set.push(&[1, 2, 3, 0]).unwrap();
        set.push(&[4, 5, 6, 0]).unwrap();
        set.push(&[7, 8, 9, 0]).unwrap();
        for index in 0..set.len() {
            let addr = set.get(index).unwrap().as_ptr() as usize;
            assert_eq!(addr % 4, 0, "item {index} is not 4-aligned");
        }
        assert_eq!(set.get(1), Some(&[4, 5, 6, 0][..]));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_overflow() {
        let mut set = RawSet::new(16);
        set.reserve(usize::MAX / 8);
    }
}
