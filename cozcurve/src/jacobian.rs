//! Points in Jacobian coordinates.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use widebn::LaneMask;
use widefield::FieldElement;

use crate::affine::AffinePoint;
use crate::curve::CurveParams;

/// A lane batch of curve points in Jacobian coordinates: the affine point
/// is `(X / Z^2, Y / Z^3)`.
///
/// The point at infinity (`Z = 0`) is never constructed by this crate and
/// has no defined behavior here; inputs come from
/// [`Self::from_affine`] and stay on the finite part of the curve for the
/// documented scalar ranges.
#[derive(Clone, Copy)]
pub struct JacobianPoint<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> {
    pub(crate) x: FieldElement<C, LIMBS, LANES>,
    pub(crate) y: FieldElement<C, LIMBS, LANES>,
    pub(crate) z: FieldElement<C, LIMBS, LANES>,
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> JacobianPoint<C, LIMBS, LANES> {
    /// Lifts an affine batch: `Z` is one in every lane.
    pub fn from_affine(point: &AffinePoint<C, LIMBS, LANES>) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: FieldElement::ONE,
        }
    }

    /// The curve generator, broadcast to every lane, with `Z = 1`.
    pub fn generator() -> Self {
        Self::from_affine(&AffinePoint::generator())
    }

    /// Projects back to affine coordinates. One field inversion dominates.
    ///
    /// The caller guarantees `Z != 0` (this crate never produces `Z = 0`
    /// from its documented input domain); a zero lane would come back as
    /// garbage zeros rather than a diagnostic.
    pub fn to_affine(&self) -> AffinePoint<C, LIMBS, LANES> {
        let z_inv = self.z.invert_unchecked();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2 * z_inv;
        AffinePoint {
            x: self.x * z_inv2,
            y: self.y * z_inv3,
        }
    }

    /// Negates the point by negating `Y`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// The `X` coordinate.
    pub fn x(&self) -> &FieldElement<C, LIMBS, LANES> {
        &self.x
    }

    /// The `Y` coordinate.
    pub fn y(&self) -> &FieldElement<C, LIMBS, LANES> {
        &self.y
    }

    /// The `Z` coordinate.
    pub fn z(&self) -> &FieldElement<C, LIMBS, LANES> {
        &self.z
    }

    /// Per-lane blend of whole points.
    pub fn select(mask: &LaneMask<LANES>, a: &Self, b: &Self) -> Self {
        Self {
            x: FieldElement::select(mask, &a.x, &b.x),
            y: FieldElement::select(mask, &a.y, &b.y),
            z: FieldElement::select(mask, &a.z, &b.z),
        }
    }

    /// Per-lane conditional exchange of whole points.
    pub fn swap(mask: &LaneMask<LANES>, a: &mut Self, b: &mut Self) {
        FieldElement::swap(mask, &mut a.x, &mut b.x);
        FieldElement::swap(mask, &mut a.y, &mut b.y);
        FieldElement::swap(mask, &mut a.z, &mut b.z);
    }

    /// Per-lane conditional exchange of `X`/`Y` only, for pairs that share
    /// `Z`. The ladder swaps its two co-Z accumulators this way, saving a
    /// third of the swap work.
    pub fn swap_coz(mask: &LaneMask<LANES>, a: &mut Self, b: &mut Self) {
        debug_assert!(bool::from(a.z.ct_eq(&b.z)));
        FieldElement::swap(mask, &mut a.x, &mut b.x);
        FieldElement::swap(mask, &mut a.y, &mut b.y);
    }
}

/// Coordinate-wise comparison. Jacobian representations are only unique up
/// to the choice of `Z`, so this is meaningful between points known to
/// share `Z` (such as a co-Z pair); normalize independently-derived points
/// through [`JacobianPoint::to_affine`] before comparing them.
impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConstantTimeEq
    for JacobianPoint<C, LIMBS, LANES>
{
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.z.ct_eq(&other.z)
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConditionallySelectable
    for JacobianPoint<C, LIMBS, LANES>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> fmt::Debug
    for JacobianPoint<C, LIMBS, LANES>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JacobianPoint")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::JacobianPoint;
    use crate::coz::dblu;
    use crate::testing::Jacobian;
    use subtle::ConstantTimeEq;
    use widebn::LaneMask;

    #[test]
    fn affine_round_trip() {
        let g = Jacobian::generator();
        let affine = g.to_affine();
        assert_eq!(Jacobian::from_affine(&affine).to_affine(), affine);
    }

    #[test]
    fn negation_is_an_involution() {
        let g = Jacobian::generator();
        assert!(bool::from(g.neg().neg().ct_eq(&g)));
        // Negating flips y only.
        assert_eq!(g.neg().to_affine().x, g.to_affine().x);
    }

    #[test]
    fn point_swap_identities() {
        let g = Jacobian::generator();
        let (doubled, _) = dblu(&g);

        let (mut a, mut b) = (g, doubled);
        JacobianPoint::swap(&LaneMask::ALL_FALSE, &mut a, &mut b);
        assert!(bool::from(a.ct_eq(&g)));
        assert!(bool::from(b.ct_eq(&doubled)));

        JacobianPoint::swap(&LaneMask::ALL_TRUE, &mut a, &mut b);
        assert!(bool::from(a.ct_eq(&doubled)));
        assert!(bool::from(b.ct_eq(&g)));
    }

    #[test]
    fn coz_swap_preserves_the_shared_z() {
        let g = Jacobian::generator();
        // dblu rescales its companion, so the pair is co-Z.
        let (mut doubled, mut low) = dblu(&g);
        let z = *doubled.z();

        JacobianPoint::swap_coz(&LaneMask::ALL_TRUE, &mut low, &mut doubled);
        assert!(bool::from(doubled.z().ct_eq(&z)));
        assert!(bool::from(low.z().ct_eq(&z)));
        // The swap exchanged the points' x/y payloads.
        assert_eq!(doubled.to_affine(), g.to_affine());
    }

    #[test]
    fn select_blends_per_lane() {
        let g = Jacobian::generator();
        let (doubled, _) = dblu(&g);
        let picked = JacobianPoint::select(&LaneMask::ALL_TRUE, &g, &doubled);
        assert!(bool::from(picked.ct_eq(&doubled)));
        let picked = JacobianPoint::select(&LaneMask::ALL_FALSE, &g, &doubled);
        assert!(bool::from(picked.ct_eq(&g)));
    }
}
