//! Co-Z Jacobian point operations.
//!
//! Two Jacobian points are *co-Z* when they share the same `Z` coordinate;
//! the formulas below (Goundar–Joye–Rivain, <https://eprint.iacr.org/2010/309>)
//! exploit that to fuse doublings and additions into fixed sequences of
//! field operations. Each operation returns the new point *and* a rescaled
//! copy of one input sharing the new `Z`, so the co-Z relationship is an
//! explicit value handed back to the caller rather than a hidden in-place
//! update. The returned pair's `Z` coordinates are identical bit for bit.

use subtle::ConstantTimeEq;
use widefield::FieldElement;

use crate::curve::CurveParams;
use crate::jacobian::JacobianPoint;

type Point<C, const LIMBS: usize, const LANES: usize> = JacobianPoint<C, LIMBS, LANES>;

/// Doubling with co-Z update: `(2P, P')` where `P'` represents `P` with the
/// same `Z` as `2P`.
///
/// Requires `Z(P) = 1` (in Montgomery terms, the field one); the ladder
/// uses this once, on its freshly lifted input.
pub fn dblu<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    p: &Point<C, LIMBS, LANES>,
) -> (Point<C, LIMBS, LANES>, Point<C, LIMBS, LANES>) {
    debug_assert!(bool::from(p.z.ct_eq(&FieldElement::ONE)));

    let b = p.x.square();
    let e = p.y.square();
    let l = e.square();
    let s = ((p.x + e).square() - b - l).double();
    // a = -3, so M = 3B + a collapses to 3(B - 1).
    let three = FieldElement::ONE.double() + FieldElement::ONE;
    let m = b.double() + b - three;

    let x2 = m.square() - s.double();
    let l8 = l.shl(3);
    let y2 = m * (s - x2) - l8;
    let z2 = p.y.double();

    let doubled = JacobianPoint {
        x: x2,
        y: y2,
        z: z2,
    };
    let updated = JacobianPoint {
        x: s,
        y: l8,
        z: z2,
    };
    (doubled, updated)
}

/// Co-Z addition with update: `(P + Q, P')` where `P'` represents `P` with
/// the same `Z` as the sum. `P` and `Q` must be co-Z on entry.
pub fn zaddu<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    p: &Point<C, LIMBS, LANES>,
    q: &Point<C, LIMBS, LANES>,
) -> (Point<C, LIMBS, LANES>, Point<C, LIMBS, LANES>) {
    debug_assert!(bool::from(p.z.ct_eq(&q.z)));

    let c = (p.x - q.x).square();
    let w1 = p.x * c;
    let w2 = q.x * c;
    let d = (p.y - q.y).square();
    let a1 = p.y * (w1 - w2);

    let x3 = d - w1 - w2;
    let y3 = (p.y - q.y) * (w1 - x3) - a1;
    let z3 = p.z * (p.x - q.x);

    let sum = JacobianPoint {
        x: x3,
        y: y3,
        z: z3,
    };
    let updated = JacobianPoint {
        x: w1,
        y: a1,
        z: z3,
    };
    (sum, updated)
}

/// Co-Z doubling-addition with update: `(2P + Q, Q')` where `Q'` represents
/// `Q` with the same `Z` as the result. `P` and `Q` must be co-Z on entry.
///
/// This is the ladder's per-bit step: one call, fixed shape, independent of
/// every bit value.
pub fn zdau<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    p: &Point<C, LIMBS, LANES>,
    q: &Point<C, LIMBS, LANES>,
) -> (Point<C, LIMBS, LANES>, Point<C, LIMBS, LANES>) {
    debug_assert!(bool::from(p.z.ct_eq(&q.z)));

    let c_inner = (p.x - q.x).square();
    let w1_inner = p.x * c_inner;
    let w2_inner = q.x * c_inner;
    let d_inner = (p.y - q.y).square();
    let a1_inner = p.y * (w1_inner - w2_inner);
    let x3_inner = d_inner - w1_inner - w2_inner;

    let c = (x3_inner - w1_inner).square();
    let y3_inner =
        ((p.y - q.y) + (w1_inner - x3_inner)).square() - d_inner - c - a1_inner.double();

    let w1 = x3_inner.shl(2) * c;
    let w2 = w1_inner.shl(2) * c;
    let d = (y3_inner - a1_inner.double()).square();
    let a1 = y3_inner * (w1 - w2);

    let x3 = d - w1 - w2;
    let y3 = (y3_inner - a1_inner.double()) * (w1 - x3) - a1;
    let z3 = p.z * ((p.x - q.x + x3_inner - w1_inner).square() - c_inner - c);

    let d_up = (y3_inner + a1_inner.double()).square();
    let x2 = d_up - w1 - w2;
    let y2 = (y3_inner + a1_inner.double()) * (w1 - x2) - a1;

    let result = JacobianPoint {
        x: x3,
        y: y3,
        z: z3,
    };
    let updated = JacobianPoint {
        x: x2,
        y: y2,
        z: z3,
    };
    (result, updated)
}

/// Mixed addition `A + B` where `Z(B) = 1`. Used once per scalar
/// multiplication, for the final parity correction.
pub fn add_z2_1<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    a: &Point<C, LIMBS, LANES>,
    b: &Point<C, LIMBS, LANES>,
) -> Point<C, LIMBS, LANES> {
    debug_assert!(bool::from(b.z.ct_eq(&FieldElement::ONE)));

    let z1z1 = a.z.square();
    let u2 = b.x * z1z1;
    let s2 = b.y * a.z * z1z1;
    let h = u2 - a.x;
    let hh = h.square();
    let i = hh.shl(2);
    let j = h * i;
    let r = (s2 - a.y).double();
    let v = a.x * i;

    let x3 = r.square() - j - v.double();
    let y3 = r * (v - x3) - a.y.double() * j;
    let z3 = (a.z + h).square() - z1z1 - hh;

    JacobianPoint {
        x: x3,
        y: y3,
        z: z3,
    }
}

/// Tripling with co-Z update: `(3P, P')`, composed from [`dblu`] and
/// [`zaddu`]. Seeding the ladder with `{P, 3P}` instead of `{P, 2P}`
/// decouples its initial state from the first processed bit.
pub fn trplu<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize>(
    p: &Point<C, LIMBS, LANES>,
) -> (Point<C, LIMBS, LANES>, Point<C, LIMBS, LANES>) {
    let (doubled, p1) = dblu(p);
    zaddu(&p1, &doubled)
}
