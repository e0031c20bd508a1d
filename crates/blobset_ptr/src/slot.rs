use core::fmt;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use core::slice;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_slot {
    ($slot:ident) => {
        impl From<$slot<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(slot: $slot<'_>) -> Self {
                slot.ptr
            }
        }

        impl $slot<'_> {
            /// Returns the width of the item in bytes.
            #[inline(always)]
            pub const fn size(&self) -> usize {
                self.size
            }

            /// Check if the slot is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.ptr.as_ptr().cast::<T>().is_aligned()
            }

            /// A function that only checks alignment and width in debug mode.
            ///
            /// Ensure that no expenses in release mode.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_fits<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "slot is not aligned. Address {:p} does not have alignment {} for type {}",
                    self.ptr,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
                debug_assert_eq!(
                    self.size,
                    size_of::<T>(),
                    "slot width does not match the size of type {}",
                    core::any::type_name::<T>(),
                );
            }
        }

        impl fmt::Pointer for $slot<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.ptr, f)
            }
        }

        impl fmt::Debug for $slot<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?}; {})", stringify!($slot), self.ptr, self.size)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Slot

/// A shared view of one initialized item, similar to `&'a [u8]` of a fixed width.
///
/// # type-erased
///
/// The slot only knows how many bytes the item occupies. Reading it as a
/// concrete type requires the caller to know the type and its alignment.
///
/// # borrow-like
///
/// - All `size` bytes must be initialized.
/// - The lifetime `'a` accurately represents how long the slot is valid for.
///
/// # Examples
///
/// ```
/// # use blobset_ptr::Slot;
/// let x = 7u32.to_ne_bytes();
/// let slot = Slot::from_bytes(&x);
///
/// assert_eq!(slot.size(), 4);
/// assert!(slot.bytes_eq(&7u32.to_ne_bytes()));
/// ```
#[derive(Copy, Clone)]
pub struct Slot<'a> {
    ptr: NonNull<u8>,
    size: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl_slot!(Slot);

impl<'a> Slot<'a> {
    /// Create a `Slot` from a raw pointer and an item width.
    ///
    /// # Safety
    /// - `ptr` must be valid for reads of `size` bytes during `'a`.
    /// - All `size` bytes must be initialized.
    /// - The bytes must not be mutated while the slot is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>, size: usize) -> Slot<'a> {
        Slot {
            ptr,
            size,
            _marker: PhantomData,
        }
    }

    /// Creates a `Slot` covering a whole byte slice.
    #[inline(always)]
    pub const fn from_bytes(bytes: &'a [u8]) -> Slot<'a> {
        Slot {
            ptr: NonNull::from_ref(bytes).cast(),
            size: bytes.len(),
            _marker: PhantomData,
        }
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Returns the bytes of the item with the slot's lifetime.
    #[inline(always)]
    pub const fn as_bytes(self) -> &'a [u8] {
        // SAFETY: `size` initialized bytes, see `new`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// Returns `true` if `other` has the same width and the same bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_ptr::Slot;
    /// let a = [1u8, 2, 3];
    /// let slot = Slot::from_bytes(&a);
    ///
    /// assert!(slot.bytes_eq(&[1, 2, 3]));
    /// assert!(!slot.bytes_eq(&[1, 2]));
    /// assert!(!slot.bytes_eq(&[1, 2, 4]));
    /// ```
    #[inline]
    pub fn bytes_eq(self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }

    /// Convert this [`Slot`] into a `&T` with the same lifetime `'a`.
    ///
    /// It is recommended to use [`debug_assert_fits`](Self::debug_assert_fits)
    /// to check alignment and width before calling.
    ///
    /// # Safety
    /// - `T` must match the actual type of the item.
    /// - The slot must be properly aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: Type correct, ptr aligned and pointee valid object.
        unsafe { &*self.ptr.as_ptr().cast::<T>() }
    }
}

impl<'a> From<&'a [u8]> for Slot<'a> {
    #[inline]
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

// -----------------------------------------------------------------------------
// SlotMut

/// A writable view of one item, which may still be uninitialized.
///
/// This is the type handed out by slot-reserving operations of a container:
/// the container has already counted the item, the caller fills it in.
///
/// # mutable and exclusive
///
/// It cannot be cloned, and the caller must comply with Rust alias rules.
///
/// # Examples
///
/// ```
/// # use blobset_ptr::SlotMut;
/// let mut buf = [0u8; 4];
/// let slot = SlotMut::from_bytes_mut(&mut buf);
///
/// slot.copy_from(&[9, 8, 7, 6]);
/// assert_eq!(buf, [9, 8, 7, 6]);
/// ```
pub struct SlotMut<'a> {
    ptr: NonNull<u8>,
    size: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl_slot!(SlotMut);

impl<'a> SlotMut<'a> {
    /// Create a `SlotMut` from a raw pointer and an item width.
    ///
    /// # Safety
    /// - `ptr` must be valid for writes of `size` bytes during `'a`.
    /// - No other pointer may access those bytes while the slot is alive.
    ///
    /// The bytes do not need to be initialized.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>, size: usize) -> SlotMut<'a> {
        SlotMut {
            ptr,
            size,
            _marker: PhantomData,
        }
    }

    /// Creates a `SlotMut` covering a whole mutable byte slice.
    #[inline(always)]
    pub const fn from_bytes_mut(bytes: &'a mut [u8]) -> SlotMut<'a> {
        let size = bytes.len();
        SlotMut {
            ptr: NonNull::from_mut(bytes).cast(),
            size,
            _marker: PhantomData,
        }
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Gets a [`SlotMut`] from self with a **smaller** lifetime.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> SlotMut<'_> {
        SlotMut {
            ptr: self.ptr,
            size: self.size,
            _marker: PhantomData,
        }
    }

    /// Fills the item with `src` and returns it as initialized bytes.
    ///
    /// # Panics
    /// Panics if `src.len()` is not the width of the slot.
    #[inline]
    #[track_caller]
    pub fn copy_from(self, src: &[u8]) -> &'a mut [u8] {
        assert_eq!(
            src.len(),
            self.size,
            "source width does not match the slot width",
        );
        // SAFETY: `size` writable bytes, `src` cannot alias an exclusive slot.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr(), self.size);
            slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size)
        }
    }

    /// Moves `value` into the item and returns a reference to it.
    ///
    /// The previous content is overwritten without being dropped.
    ///
    /// # Safety
    /// - The slot must be properly aligned for `T`.
    /// - The slot width must be `size_of::<T>()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blobset_ptr::SlotMut;
    /// # use core::ptr::NonNull;
    /// let mut x = 0u64;
    /// let slot = unsafe { SlotMut::new(NonNull::from_mut(&mut x).cast(), 8) };
    ///
    /// slot.debug_assert_fits::<u64>();
    /// let rx = unsafe { slot.write(42u64) };
    /// *rx += 1;
    /// assert_eq!(x, 43);
    /// ```
    #[inline(always)]
    pub unsafe fn write<T>(self, value: T) -> &'a mut T {
        let dst = self.ptr.as_ptr().cast::<T>();
        // SAFETY: aligned and wide enough for `T`, see function docs.
        unsafe {
            ptr::write(dst, value);
            &mut *dst
        }
    }

    /// Converts the slot into initialized bytes.
    ///
    /// # Safety
    /// All `size` bytes must have been initialized.
    #[inline(always)]
    pub const unsafe fn assume_init(self) -> &'a mut [u8] {
        // SAFETY: see function docs.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl<'a> From<&'a mut [u8]> for SlotMut<'a> {
    #[inline]
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::from_bytes_mut(bytes)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Slot, SlotMut};
    use core::ptr::NonNull;

    #[test]
    fn zero_width_slots() {
        let empty: [u8; 0] = [];
        let slot = Slot::from_bytes(&empty);
        assert_eq!(slot.size(), 0);
        assert!(slot.bytes_eq(&[]));

        let mut unit = ();
        let slot = unsafe { SlotMut::new(NonNull::from_mut(&mut unit).cast(), 0) };
        slot.debug_assert_fits::<()>();
        assert!(slot.copy_from(&[]).is_empty());
    }

    #[test]
    fn reborrow_then_fill() {
        let mut buf = [0u8; 2];
        let mut slot = SlotMut::from_bytes_mut(&mut buf);
        slot.reborrow().copy_from(&[1, 1]);
        let bytes = slot.copy_from(&[3, 4]);
        assert_eq!(bytes, &[3, 4]);
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn typed_read_back() {
        let mut x = [0u32; 2];
        let slot = unsafe { SlotMut::new(NonNull::from_mut(&mut x[1]).cast(), 4) };
        assert!(slot.is_aligned::<u32>());
        let shared = unsafe {
            slot.write(0xdead_beef_u32);
            Slot::new(NonNull::from_ref(&x[1]).cast(), 4)
        };
        assert_eq!(unsafe { *shared.as_ref::<u32>() }, 0xdead_beef);
        assert!(shared.bytes_eq(&0xdead_beef_u32.to_ne_bytes()));
    }

    #[test]
    #[should_panic(expected = "source width does not match the slot width")]
    fn copy_from_wrong_width() {
        let mut buf = [0u8; 3];
        SlotMut::from_bytes_mut(&mut buf).copy_from(&[1, 2]);
    }
}
