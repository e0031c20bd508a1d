#![doc = include_str!("../README.md")]
#![expect(unsafe_code, reason = "Manual memory management of untyped items.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod blob;
mod error;
mod raw_set;

// -----------------------------------------------------------------------------
// Top-level exports

pub use blobset_ptr::{Slot, SlotMut};
pub use error::SetError;
pub use raw_set::RawSet;
