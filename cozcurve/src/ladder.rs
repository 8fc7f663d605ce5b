//! Constant-time scalar multiplication over co-Z accumulators.

use subtle::ConstantTimeEq;
use widebn::{LaneMask, Uint, WideUint};
use widefield::FieldElement;

use crate::coz::{add_z2_1, trplu, zdau};
use crate::curve::CurveParams;
use crate::jacobian::JacobianPoint;

/// Multiplies `point` by one scalar per lane.
///
/// The ladder keeps two co-Z accumulators and processes every bit of the
/// scalar width with exactly one [`zdau`] and two masked swaps — the swap
/// masks are the only place scalar bits enter, and they do so as whole-word
/// lane masks feeding branch-free exchanges. Trace length and shape are
/// fixed by the limb count alone.
///
/// Preconditions (unchecked beyond debug assertions, to keep the trace
/// fixed): `point` has `Z = 1` in every lane, i.e. it came from
/// [`JacobianPoint::from_affine`], and is not the identity; each lane's
/// scalar is nonzero modulo the group order. Outside that domain the
/// result is unspecified.
pub fn scalar_mul<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    scalars: &WideUint<LIMBS, LANES>,
    point: &JacobianPoint<C, LIMBS, LANES>,
) -> JacobianPoint<C, LIMBS, LANES> {
    debug_assert!(bool::from(point.z().ct_eq(&FieldElement::ONE)));

    let opp = point.neg();
    // acc = 3P and low = 1P, sharing one Z.
    let (mut acc, mut low) = trplu(point);

    // Bit 1 aligns the pair with the loop's swap convention.
    let m1 = scalars.bit_mask(1);
    JacobianPoint::swap_coz(&m1, &mut low, &mut acc);

    for bit in 2..Uint::<LIMBS>::BITS {
        let mask = scalars.bit_mask(bit);
        JacobianPoint::swap_coz(&mask, &mut low, &mut acc);
        let (next_acc, next_low) = zdau(&acc, &low);
        acc = next_acc;
        low = next_low;
        JacobianPoint::swap_coz(&mask, &mut low, &mut acc);
    }

    // The ladder computes as if the scalar were odd; lanes with an even
    // scalar are off by one copy of the input, corrected by a single mixed
    // addition of its negation and a lane blend.
    let even = !scalars.bit_mask(0);
    let corrected = add_z2_1(&low, &opp);
    JacobianPoint::select(&even, &low, &corrected)
}

/// Multiplies `point` by a single scalar shared by all lanes.
///
/// Identical mathematics to [`scalar_mul`]; the bits come from one scalar
/// and are broadcast to every lane, so the swaps are still branch-free
/// masked exchanges. Same preconditions.
pub fn scalar_mul_single<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    scalar: &Uint<LIMBS>,
    point: &JacobianPoint<C, LIMBS, LANES>,
) -> JacobianPoint<C, LIMBS, LANES> {
    debug_assert!(bool::from(point.z().ct_eq(&FieldElement::ONE)));

    let opp = point.neg();
    let (mut acc, mut low) = trplu(point);

    let m1 = LaneMask::broadcast(scalar.bit(1));
    JacobianPoint::swap_coz(&m1, &mut low, &mut acc);

    for bit in 2..Uint::<LIMBS>::BITS {
        let mask = LaneMask::broadcast(scalar.bit(bit));
        JacobianPoint::swap_coz(&mask, &mut low, &mut acc);
        let (next_acc, next_low) = zdau(&acc, &low);
        acc = next_acc;
        low = next_low;
        JacobianPoint::swap_coz(&mask, &mut low, &mut acc);
    }

    let even = LaneMask::broadcast(!scalar.is_odd());
    let corrected = add_z2_1(&low, &opp);
    JacobianPoint::select(&even, &low, &corrected)
}
