use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use core::slice;

use blobset_raw::{RawSet, SetError};

// -----------------------------------------------------------------------------
// Set

/// A growable, contiguous container of `T` with duplicate-free insertion.
///
/// `Set` is a typed view over a [`RawSet`]: items live in one allocation
/// in positional order, capacity doubles when the set is full and is never
/// reduced. Items are `Copy` because they are moved with raw byte copies
/// and never dropped.
///
/// Plain [`push`](Set::push) and [`insert`](Set::insert) accept duplicates,
/// while [`add`](Set::add) and [`insert_unique`](Set::insert_unique) first
/// scan the set for an equal item and do nothing if one is found.
///
/// # Examples
///
/// ```
/// use blobset_typed::Set;
///
/// let mut set = Set::new();
/// set.push(1u32);
/// set.push(2);
/// set.push(3);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.capacity(), 4);
///
/// assert!(!set.add(2));
/// assert!(set.add(4));
/// assert_eq!(set.as_slice(), &[1, 2, 3, 4]);
/// ```
pub struct Set<T> {
    raw: RawSet,
    _marker: PhantomData<T>,
}

// -----------------------------------------------------------------------------
// Basic methods

impl<T: Copy> Set<T> {
    /// Creates an empty set without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self {
            raw: RawSet::with_layout(Layout::new::<T>()),
            _marker: PhantomData,
        }
    }

    /// Creates an empty set with exactly `capacity` slots.
    ///
    /// ```
    /// # use blobset_typed::Set;
    /// let set = Set::<u16>::with_capacity(10);
    /// assert_eq!(set.capacity(), 10);
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut set = Self::new();
        set.reserve(capacity);
        set
    }

    /// Returns the number of items.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set holds no items.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of allocated slots.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the items as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the storage is aligned for `T` and `0..len` are initialized.
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast::<T>(), self.raw.len()) }
    }

    /// Returns the items as a mutable slice.
    ///
    /// Writing through the slice may introduce duplicates.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.raw.len();
        // SAFETY: the storage is aligned for `T` and `0..len` are initialized.
        unsafe { slice::from_raw_parts_mut(self.raw.as_mut_ptr().cast::<T>(), len) }
    }

    /// Grows the capacity to exactly `min_capacity` slots, if it is smaller.
    #[inline]
    pub fn reserve(&mut self, min_capacity: usize) {
        self.raw.reserve(min_capacity);
    }

    /// Removes all items, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Creates an independent copy whose capacity equals the current length.
    #[inline]
    pub fn copy(&self) -> Self {
        Self {
            raw: self.raw.copy(),
            _marker: PhantomData,
        }
    }
}

// -----------------------------------------------------------------------------
// Positional operations

impl<T: Copy> Set<T> {
    /// Appends `value`, even if an equal item is already present.
    #[inline]
    pub fn push(&mut self, value: T) {
        // SAFETY: the slot is aligned and sized for `T` and fully written.
        unsafe {
            self.raw.append_slot().write(value);
        }
    }

    /// Inserts `value` at `index`, moving the trailing items right.
    ///
    /// `index == len` appends.
    ///
    /// ```
    /// # use blobset_typed::{Set, SetError};
    /// let mut set = Set::from_iter([1, 2]);
    /// set.insert(2, 3).unwrap();
    /// set.insert(0, 0).unwrap();
    /// assert_eq!(set.as_slice(), &[0, 1, 2, 3]);
    ///
    /// assert_eq!(
    ///     set.insert(5, 9),
    ///     Err(SetError::IndexOutOfBounds { index: 5, len: 4 }),
    /// );
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), SetError> {
        self.check_insert_index(index)?;
        // SAFETY: index checked above.
        unsafe { self.insert_unchecked(index, value) };
        Ok(())
    }

    /// Inserts `value` at `index` without checking the index.
    ///
    /// # Safety
    /// - `index` must be `<= len`
    #[inline]
    pub unsafe fn insert_unchecked(&mut self, index: usize, value: T) {
        // SAFETY: the slot is aligned and sized for `T` and fully written.
        unsafe {
            self.raw.insert_slot(index).write(value);
        }
    }

    /// Removes `count` items starting at `start`.
    #[inline]
    pub fn erase(&mut self, start: usize, count: usize) -> Result<(), SetError> {
        self.raw.erase(start, count)
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, SetError> {
        match self.as_slice().get(index) {
            Some(&value) => {
                // SAFETY: `index < len`.
                unsafe { self.raw.remove_unchecked(index) };
                Ok(value)
            }
            None => Err(SetError::IndexOutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }

    /// Removes and returns the item at `index` without checking the index.
    ///
    /// # Safety
    /// - `index` must be `< len`
    #[inline]
    pub unsafe fn remove_unchecked(&mut self, index: usize) -> T {
        // SAFETY: `index < len`.
        unsafe {
            let value = *self.as_slice().get_unchecked(index);
            self.raw.remove_unchecked(index);
            value
        }
    }

    /// Removes and returns the last item, or `None` if the set is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let value = *self.as_slice().last()?;
        // SAFETY: not empty.
        unsafe { self.raw.pop_unchecked() };
        Some(value)
    }

    /// Like [`pop`](Self::pop), but reports an empty set as an error.
    #[inline]
    pub fn try_pop(&mut self) -> Result<T, SetError> {
        self.pop().ok_or(SetError::Empty)
    }

    #[inline]
    fn check_insert_index(&self, index: usize) -> Result<(), SetError> {
        if index <= self.len() {
            Ok(())
        } else {
            Err(SetError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }
}

// -----------------------------------------------------------------------------
// Duplicate-free operations

impl<T: Copy + PartialEq> Set<T> {
    /// Returns `true` if an item equal to `value` is present.
    ///
    /// This is a linear scan.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }

    /// Returns the index of the first item equal to `value`.
    #[inline]
    pub fn position(&self, value: &T) -> Option<usize> {
        self.as_slice().iter().position(|item| item == value)
    }

    /// Appends `value` unless an equal item is already present.
    ///
    /// Returns `true` if the value was added.
    #[inline]
    pub fn add(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.push(value);
        true
    }

    /// Inserts `value` at `index` unless an equal item is already present.
    ///
    /// Returns `Ok(true)` if the value was inserted. The index is validated
    /// even when the value is a duplicate.
    ///
    /// ```
    /// # use blobset_typed::Set;
    /// let mut set = Set::from_iter(['a', 'c']);
    /// assert_eq!(set.insert_unique(1, 'b'), Ok(true));
    /// assert_eq!(set.insert_unique(0, 'c'), Ok(false));
    /// assert_eq!(set.as_slice(), &['a', 'b', 'c']);
    /// ```
    pub fn insert_unique(&mut self, index: usize, value: T) -> Result<bool, SetError> {
        self.check_insert_index(index)?;
        if self.contains(&value) {
            return Ok(false);
        }
        // SAFETY: index checked above.
        unsafe { self.insert_unchecked(index, value) };
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<T: Copy> Default for Set<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Clone for Set<T> {
    /// Equivalent to [`Set::copy`], the clone is size-tight.
    #[inline]
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Copy + PartialEq> PartialEq for Set<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq> Eq for Set<T> {}

impl<T: Copy> AsRef<[T]> for Set<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy> Index<usize> for Set<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Copy> IndexMut<usize> for Set<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: Copy + PartialEq> Extend<T> for Set<T> {
    /// Adds every value, skipping the ones already present.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| {
            self.add(value);
        });
    }
}

impl<T: Copy + PartialEq> FromIterator<T> for Set<T> {
    /// Collects the distinct values in first-seen order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

// -----------------------------------------------------------------------------
// Tests
