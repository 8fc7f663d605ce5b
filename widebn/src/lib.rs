#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

//! Fixed-width big-integer arithmetic over independent data-parallel lanes.
//!
//! A [`Uint`] is a fixed array of 64-bit limbs; a [`WideUint`] batches
//! several of them so that one call performs the same operation on every
//! lane. Per-lane conditions (carries, borrows, comparisons, extracted
//! bits) are [`LaneMask`]s — whole-word all-ones/all-zeros values consumed
//! by branch-free select and swap. Nothing in this crate branches on, or
//! indexes memory by, lane data.

mod limb;
mod mask;
mod uint;
mod wide;

pub use crate::limb::{WORD_BITS, Word, adc, mac, sbb};
pub use crate::mask::LaneMask;
pub use crate::uint::{U128, U256, U512, Uint};
pub use crate::wide::WideUint;

pub use rand_core;
pub use subtle;
pub use zeroize;
