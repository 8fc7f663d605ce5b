//! Points in affine coordinates.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use widefield::{Error, FieldElement, Result};

use crate::curve::CurveParams;

/// A lane batch of points on the curve in affine coordinates.
#[derive(Clone, Copy)]
pub struct AffinePoint<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> {
    /// x-coordinate.
    pub x: FieldElement<C, LIMBS, LANES>,
    /// y-coordinate.
    pub y: FieldElement<C, LIMBS, LANES>,
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> AffinePoint<C, LIMBS, LANES> {
    /// The curve generator, broadcast to every lane.
    pub fn generator() -> Self {
        Self {
            x: FieldElement::broadcast_uint(&C::GENERATOR.0),
            y: FieldElement::broadcast_uint(&C::GENERATOR.1),
        }
    }

    /// Builds the batch from explicit coordinates, without checking the
    /// curve equation.
    pub fn from_coordinates(
        x: FieldElement<C, LIMBS, LANES>,
        y: FieldElement<C, LIMBS, LANES>,
    ) -> Self {
        Self { x, y }
    }

    /// Solves the curve equation for `y` given `x`, choosing the principal
    /// square root in every lane. Absent if `x` is not on the curve in some
    /// lane.
    pub fn from_x(x: &FieldElement<C, LIMBS, LANES>) -> CtOption<Self> {
        let x = *x;
        Self::y_squared(&x).sqrt().map(|y| Self { x, y })
    }

    /// [`Self::from_x`] with the absence surfaced as [`Error::NoSquareRoot`].
    /// The conversion out of `CtOption` branches, so this is for public
    /// x-coordinates — which is the only kind decompression sees.
    pub fn try_from_x(x: &FieldElement<C, LIMBS, LANES>) -> Result<Self> {
        Option::<Self>::from(Self::from_x(x)).ok_or(Error::NoSquareRoot)
    }

    /// The right-hand side `x^3 - 3x + b` of the curve equation.
    pub(crate) fn y_squared(
        x: &FieldElement<C, LIMBS, LANES>,
    ) -> FieldElement<C, LIMBS, LANES> {
        let b = FieldElement::broadcast_uint(&C::EQUATION_B);
        let x_cubed = x.square() * x;
        let three_x = x.double() + x;
        x_cubed + b - three_x
    }

    /// Whether every lane satisfies the curve equation.
    pub fn is_on_curve(&self) -> Choice {
        self.y.square().eq_mask(&Self::y_squared(&self.x)).all()
    }

    /// Negates the point (mirrors across the x-axis).
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
        }
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConstantTimeEq
    for AffinePoint<C, LIMBS, LANES>
{
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConditionallySelectable
    for AffinePoint<C, LIMBS, LANES>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> PartialEq
    for AffinePoint<C, LIMBS, LANES>
{
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> Eq
    for AffinePoint<C, LIMBS, LANES>
{
}

impl<C: CurveParams<LIMBS>, const LIMBS: usize, const LANES: usize> fmt::Debug
    for AffinePoint<C, LIMBS, LANES>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffinePoint")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::AffinePoint;
    use crate::testing::{Affine, fe};
    use widefield::Error;

    #[test]
    fn generator_is_on_curve() {
        assert!(bool::from(Affine::generator().is_on_curve()));
        assert!(bool::from(Affine::generator().neg().is_on_curve()));
    }

    #[test]
    fn from_x_recovers_the_generator() {
        let g = Affine::generator();
        let recovered = AffinePoint::from_x(&g.x).unwrap();
        // The generator's y happens to be the principal root.
        assert_eq!(recovered, g);
        assert!(bool::from(recovered.is_on_curve()));
    }

    #[test]
    fn from_x_solves_the_equation() {
        let pt = AffinePoint::from_x(&fe(
            "0000000000000000000000000000000000000000000000000000000000000005",
        ))
        .unwrap();
        assert_eq!(
            pt.y,
            fe("459243b9aa581806fe913bce99817ade11ca503c64d9a3c533415c083248fbcc")
        );
        assert!(bool::from(pt.is_on_curve()));
    }

    #[test]
    fn from_x_rejects_off_curve_x() {
        let x = fe("0000000000000000000000000000000000000000000000000000000000000002");
        assert!(bool::from(AffinePoint::from_x(&x).is_none()));
        assert_eq!(Affine::try_from_x(&x), Err(Error::NoSquareRoot));
    }
}
