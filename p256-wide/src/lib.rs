#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

//! NIST P-256 scalar multiplication over data-parallel lanes.
//!
//! One call to [`scalar_mul`] multiplies a batch of points by a batch of
//! independent scalars — or one broadcast scalar via
//! [`scalar_mul_single`] — in constant time: the co-Z ladder underneath
//! executes the same fixed sequence of field operations for every scalar
//! value, and secret bits only ever reach branch-free masked swaps.
//!
//! The curve is also known as prime256v1 (ANSI X9.62) and secp256r1
//! (SECG); its parameters are specified in NIST SP 800-186. Its equation
//! is `y² = x³ - 3x + b` over the prime field with
//! `p = 2^224 (2^32 - 1) + 2^192 + 2^96 - 1`.
//!
//! Encoding affine results into any wire format beyond raw big-endian
//! coordinates is left to callers, as are scalar-field (mod `n`)
//! reductions: scalars here are plain 256-bit integers.

pub use cozcurve;
pub use widebn;
pub use widefield;

use widebn::{U256, WideUint};
use widefield::{FieldParams, MontyParams};

/// Field modulus serialized as hex:
/// `p = 2^224 (2^32 - 1) + 2^192 + 2^96 - 1`.
const MODULUS_HEX: &str = "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";

/// The NIST P-256 elliptic curve, as a parameter tag for the generic
/// layers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NistP256;

impl FieldParams<4> for NistP256 {
    const PARAMS: MontyParams<4> = MontyParams::new(U256::from_be_hex(MODULUS_HEX));
}

impl cozcurve::CurveParams<4> for NistP256 {
    /// `b = 41058363725152142129326129780047268409114441015993725554835256314039467401291`,
    /// the "verifiably random" constant from SP 800-186.
    const EQUATION_B: U256 =
        U256::from_be_hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");

    const GENERATOR: (U256, U256) = (
        U256::from_be_hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
        U256::from_be_hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    );
}

/// P-256 field elements over `LANES` lanes.
pub type FieldElement<const LANES: usize> = widefield::FieldElement<NistP256, 4, LANES>;

/// P-256 affine points over `LANES` lanes.
pub type AffinePoint<const LANES: usize> = cozcurve::AffinePoint<NistP256, 4, LANES>;

/// P-256 Jacobian points over `LANES` lanes.
pub type JacobianPoint<const LANES: usize> = cozcurve::JacobianPoint<NistP256, 4, LANES>;

/// A batch of one 256-bit scalar per lane.
pub type WideScalar<const LANES: usize> = WideUint<4, LANES>;

/// The generator, lifted to Jacobian coordinates in every lane.
pub fn generator<const LANES: usize>() -> JacobianPoint<LANES> {
    JacobianPoint::generator()
}

/// Multiplies `point` by one scalar per lane. See
/// [`cozcurve::scalar_mul`] for the constant-time contract and input
/// preconditions.
pub fn scalar_mul<const LANES: usize>(
    scalars: &WideScalar<LANES>,
    point: &JacobianPoint<LANES>,
) -> JacobianPoint<LANES> {
    cozcurve::scalar_mul(scalars, point)
}

/// Multiplies `point` by a single scalar broadcast across all lanes.
pub fn scalar_mul_single<const LANES: usize>(
    scalar: &U256,
    point: &JacobianPoint<LANES>,
) -> JacobianPoint<LANES> {
    cozcurve::scalar_mul_single(scalar, point)
}

/// Multiplies `point` by one scalar per lane, each given as 32 big-endian
/// bytes.
pub fn scalar_mul_bytes<const LANES: usize>(
    scalars: &[[u8; 32]; LANES],
    point: &JacobianPoint<LANES>,
) -> JacobianPoint<LANES> {
    let mut lanes = [U256::ZERO; LANES];
    for (lane, bytes) in lanes.iter_mut().zip(scalars.iter()) {
        *lane = U256::from_be_slice(bytes);
    }
    scalar_mul(&WideUint::from_lanes(lanes), point)
}
