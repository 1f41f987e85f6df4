#![allow(clippy::len_without_is_empty)]

//! Utilities shared by the `filtrate` crates.

mod bitset;
mod byte_count;

pub use bitset::{BitSet, TinySet, TinySetIterator};
pub use byte_count::ByteCount;
