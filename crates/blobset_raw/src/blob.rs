use alloc::alloc as malloc;
use core::alloc::Layout;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};

use blobset_ptr::{Slot, SlotMut};

// -----------------------------------------------------------------------------
// Blob

/// Contiguous storage for untyped items of one layout.
///
/// This type only manages the allocation. It does not know how many items
/// are initialized or allocated, the owner passes those in.
#[derive(Debug)]
pub(crate) struct Blob {
    item_layout: Layout,
    data: NonNull<u8>,
}

impl Blob {
    /// Returns `true` if this blob stores zero-sized items.
    #[inline(always)]
    pub const fn is_zst(&self) -> bool {
        self.item_layout.size() == 0
    }

    #[inline(always)]
    pub const fn layout(&self) -> Layout {
        self.item_layout
    }

    #[inline(always)]
    pub const fn item_size(&self) -> usize {
        self.item_layout.size()
    }

    /// Creates a new unallocated `Blob`.
    ///
    /// The data pointer is dangling but aligned for `item_layout`.
    #[inline(always)]
    pub const fn new(item_layout: Layout) -> Self {
        // SAFETY: alignment is never zero.
        let align = unsafe { NonZeroUsize::new_unchecked(item_layout.align()) };

        Self {
            item_layout,
            data: NonNull::without_provenance(align),
        }
    }

    /// Allocates memory for the specified capacity.
    ///
    /// # Safety
    /// - The blob must not be already allocated
    /// - The allocated memory is uninitialized
    pub unsafe fn alloc(&mut self, capacity: NonZeroUsize) {
        if !self.is_zst() {
            let new_layout = array_layout(self.item_layout, capacity.get());

            self.data = NonNull::new(unsafe { malloc::alloc(new_layout) })
                .unwrap_or_else(|| malloc::handle_alloc_error(new_layout));
        }
    }

    /// Reallocates memory from current capacity to new capacity.
    ///
    /// # Safety
    /// - The blob must be already allocated with `current_capacity`
    /// - The contents are preserved up to `min(current_capacity, new_capacity)`
    /// - Any additional memory is uninitialized
    pub unsafe fn realloc(&mut self, current_capacity: NonZeroUsize, new_capacity: NonZeroUsize) {
        if !self.is_zst() {
            let new_layout = array_layout(self.item_layout, new_capacity.get());

            self.data = NonNull::new(unsafe {
                malloc::realloc(
                    self.data.as_ptr(),
                    array_layout_unchecked(self.item_layout, current_capacity.get()),
                    new_layout.size(),
                )
            })
            .unwrap_or_else(|| malloc::handle_alloc_error(new_layout));
        }
    }

    /// Deallocates memory, zero capacity is valid.
    ///
    /// # Safety
    /// - `current_capacity` must be the current allocated capacity
    pub unsafe fn dealloc(&mut self, current_capacity: usize) {
        if current_capacity != 0 && !self.is_zst() {
            unsafe {
                let layout = array_layout_unchecked(self.item_layout, current_capacity);
                malloc::dealloc(self.data.as_ptr(), layout);
            }
        }
    }

    /// Returns the address of the first item.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Returns the mutable address of the first item.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// Returns a shared slot for the item at `index`.
    ///
    /// # Safety
    /// - `index` must be within bounds (0..capacity)
    /// - The item at `index` must be fully initialized
    #[inline(always)]
    pub const unsafe fn get(&self, index: usize) -> Slot<'_> {
        let size = self.item_layout.size();
        unsafe { Slot::new(self.data.add(index * size), size) }
    }

    /// Returns a writable slot for the item at `index`.
    ///
    /// # Safety
    /// - `index` must be within bounds (0..capacity)
    #[inline(always)]
    pub const unsafe fn get_mut(&mut self, index: usize) -> SlotMut<'_> {
        let size = self.item_layout.size();
        unsafe { SlotMut::new(self.data.add(index * size), size) }
    }

    /// Moves `count` items starting at `src` so that they start at `dst`.
    ///
    /// The ranges may overlap.
    ///
    /// # Safety
    /// - `src + count` and `dst + count` must be within bounds (0..capacity)
    /// - The items in `src..src + count` must be initialized
    #[inline]
    pub unsafe fn shift(&mut self, src: usize, dst: usize, count: usize) {
        let size = self.item_layout.size();
        unsafe {
            let base = self.data.as_ptr();
            ptr::copy::<u8>(base.add(src * size), base.add(dst * size), count * size);
        }
    }

    /// Copies the first `count` items into `other`.
    ///
    /// # Safety
    /// - Both blobs must share the same layout
    /// - `count` must be within both capacities
    /// - The items in `0..count` must be initialized
    #[inline]
    pub unsafe fn copy_to(&self, other: &mut Blob, count: usize) {
        debug_assert_eq!(self.item_layout, other.item_layout);
        let size = self.item_layout.size();
        unsafe {
            ptr::copy_nonoverlapping::<u8>(self.as_ptr(), other.as_mut_ptr(), count * size);
        }
    }
}

// -----------------------------------------------------------------------------
// alloc helper

/// Returns `true` if `n` items of `layout` fit in a single allocation.
#[inline]
pub(crate) const fn fits_in_allocation(layout: Layout, n: usize) -> bool {
    match layout.size().checked_mul(n) {
        Some(alloc_size) => alloc_size <= isize::MAX as usize,
        None => false,
    }
}

/// Creates a layout for an array with `n` elements, checking for overflow.
#[inline]
const fn array_layout(layout: Layout, n: usize) -> Layout {
    #[cold]
    #[inline(never)]
    const fn capacity_overflow() -> ! {
        panic!("capacity overflow");
    }

    if !fits_in_allocation(layout, n) {
        capacity_overflow();
    }

    unsafe { Layout::from_size_align_unchecked(layout.size() * n, layout.align()) }
}

/// Creates a layout for an array with `n` elements without checking.
///
/// # Safety
/// - `layout.size() * n` must not overflow
/// - The resulting size must be <= `isize::MAX`
#[inline]
const unsafe fn array_layout_unchecked(layout: Layout, n: usize) -> Layout {
    unsafe { Layout::from_size_align_unchecked(layout.size() * n, layout.align()) }
}

#[cfg(test)]
mod tests {
    use super::{Blob, fits_in_allocation};
    use core::alloc::Layout;
    use core::num::NonZeroUsize;

    #[test]
    fn allocation_limits() {
        let layout = Layout::new::<u64>();
        assert!(fits_in_allocation(layout, 0));
        assert!(fits_in_allocation(layout, 1024));
        assert!(!fits_in_allocation(layout, usize::MAX));
        assert!(!fits_in_allocation(layout, (isize::MAX as usize) / 4));
        assert!(fits_in_allocation(Layout::new::<()>(), usize::MAX));
    }

    #[test]
    fn dangling_is_aligned() {
        let blob = Blob::new(Layout::new::<u64>());
        assert!(blob.as_ptr().cast::<u64>().is_aligned());
        assert!(!blob.is_zst());
        assert!(Blob::new(Layout::new::<()>()).is_zst());
    }

    #[test]
    fn shift_overlapping() {
        let mut blob = Blob::new(Layout::new::<u16>());
        unsafe {
            blob.alloc(NonZeroUsize::new(4).unwrap());
            for (i, v) in [1u16, 2, 3].into_iter().enumerate() {
                blob.get_mut(i).write(v);
            }
            blob.shift(0, 1, 3);
            assert_eq!(*blob.get(1).as_ref::<u16>(), 1);
            assert_eq!(*blob.get(3).as_ref::<u16>(), 3);

            blob.realloc(NonZeroUsize::new(4).unwrap(), NonZeroUsize::new(8).unwrap());
            assert_eq!(*blob.get(2).as_ref::<u16>(), 2);
            blob.dealloc(8);
        }
    }
}
