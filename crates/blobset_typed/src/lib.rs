#![doc = include_str!("../README.md")]
#![expect(unsafe_code, reason = "Typed views over untyped storage.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod set;

#[cfg(feature = "serde")]
mod serde_impl;

// -----------------------------------------------------------------------------
// Top-level exports

pub use blobset_raw::SetError;
pub use set::Set;
