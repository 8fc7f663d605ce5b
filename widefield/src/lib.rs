#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

//! Lane-parallel prime-field arithmetic in Montgomery form.
//!
//! The [`monty`] module is the reduction layer: word-by-word REDC plus the
//! modular add/sub/double/shift and (public-exponent) exponentiation it
//! enables, all parameterized by an immutable per-modulus
//! [`MontyParams`] context. [`FieldElement`] builds GF(p) on top of it —
//! operators, Fermat inversion, and square roots for moduli congruent to
//! 3 mod 4 — batched across independent lanes like everything in
//! [`widebn`].

mod element;
mod error;
pub mod monty;
mod params;

pub use crate::element::FieldElement;
pub use crate::error::{Error, Result};
pub use crate::params::{FieldParams, MontyParams};

pub use widebn;
