#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

//! Co-Z Jacobian arithmetic for short Weierstrass curves with `a = -3`,
//! over lane-parallel prime fields.
//!
//! The [`coz`] module provides the fused doubling/addition primitives that
//! keep two Jacobian points on a shared `Z` coordinate; [`scalar_mul`] and
//! [`scalar_mul_single`] drive them as a constant-time ladder where secret
//! scalar bits only ever feed branch-free masked swaps. Curves are
//! described by the [`CurveParams`] trait and instantiated downstream.

mod affine;
pub mod coz;
mod curve;
mod jacobian;
mod ladder;

pub use crate::affine::AffinePoint;
pub use crate::curve::CurveParams;
pub use crate::jacobian::JacobianPoint;
pub use crate::ladder::{scalar_mul, scalar_mul_single};

pub use widefield;
