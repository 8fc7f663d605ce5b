//! Curve parameter trait.

use widebn::Uint;
use widefield::FieldParams;

/// Parameters of a short Weierstrass curve `y^2 = x^3 - 3x + b` over the
/// field named by the [`FieldParams`] supertrait.
///
/// The `a = -3` coefficient is fixed by this trait, not configurable: the
/// point formulas below hard-wire it. Curves with other `a` are out of
/// scope.
///
/// Coordinates are classical (non-Montgomery) residues; conversion happens
/// where the constants are consumed.
pub trait CurveParams<const LIMBS: usize>: FieldParams<LIMBS> {
    /// The `b` coefficient of the curve equation.
    const EQUATION_B: Uint<LIMBS>;

    /// Affine coordinates of the generator point.
    const GENERATOR: (Uint<LIMBS>, Uint<LIMBS>);
}
