#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use blobset_ptr as ptr;
pub use blobset_raw as raw;
pub use blobset_typed as typed;

pub use blobset_raw::{RawSet, SetError};
pub use blobset_typed::{Set, set};
