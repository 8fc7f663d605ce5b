//! Prime-field elements in Montgomery form, batched across lanes.

use core::fmt;
use core::iter::{Product, Sum};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use widebn::{LaneMask, Uint, WideUint};
use zeroize::DefaultIsZeroes;

use crate::monty;
use crate::params::FieldParams;

/// An element of GF(p), held in Montgomery form and always fully reduced,
/// in `LANES` independent lanes. The modulus is carried in the type through
/// the `MOD` marker, so elements of different fields cannot be mixed.
#[derive(Clone, Copy)]
pub struct FieldElement<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> {
    value: WideUint<LIMBS, LANES>,
    _mod: PhantomData<MOD>,
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize>
    FieldElement<MOD, LIMBS, LANES>
{
    /// The additive identity in every lane.
    pub const ZERO: Self = Self {
        value: WideUint::ZERO,
        _mod: PhantomData,
    };

    /// The multiplicative identity in every lane.
    pub const ONE: Self = Self {
        value: WideUint::broadcast(MOD::PARAMS.one),
        _mod: PhantomData,
    };

    /// Wraps a batch that is already in Montgomery form and reduced.
    pub(crate) const fn from_montgomery_unchecked(value: WideUint<LIMBS, LANES>) -> Self {
        Self {
            value,
            _mod: PhantomData,
        }
    }

    /// Converts classical residues into field elements. The caller is
    /// responsible for the inputs being `< p`; use
    /// [`Self::from_uints_checked`] when that is not structurally
    /// guaranteed.
    pub fn from_uints(value: &WideUint<LIMBS, LANES>) -> Self {
        debug_assert!(bool::from(
            value.lt(&WideUint::broadcast(MOD::PARAMS.modulus)).all()
        ));
        Self::from_montgomery_unchecked(monty::to_montgomery(value, &MOD::PARAMS))
    }

    /// Converts classical residues, rejecting the batch unless every lane
    /// is below the modulus.
    pub fn from_uints_checked(value: &WideUint<LIMBS, LANES>) -> CtOption<Self> {
        let in_range = value.lt(&WideUint::broadcast(MOD::PARAMS.modulus)).all();
        CtOption::new(
            Self::from_montgomery_unchecked(monty::to_montgomery(value, &MOD::PARAMS)),
            in_range,
        )
    }

    /// Broadcasts one classical residue (`< p`) into every lane.
    pub fn broadcast_uint(value: &Uint<LIMBS>) -> Self {
        Self::from_uints(&WideUint::broadcast(*value))
    }

    /// Returns the classical residues.
    pub fn to_uints(&self) -> WideUint<LIMBS, LANES> {
        monty::from_montgomery(&self.value, &MOD::PARAMS)
    }

    /// The raw Montgomery-form words. Exposed for the layers above that
    /// select and swap elements; the representation invariant (`< p`,
    /// Montgomery domain) must be preserved.
    pub const fn as_montgomery(&self) -> &WideUint<LIMBS, LANES> {
        &self.value
    }

    /// Generates a uniformly random element per lane, by Montgomery
    /// reduction of a double-width random value.
    pub fn random(rng: &mut impl rand_core::RngCore) -> Self {
        let lo = WideUint::random(rng);
        let hi = WideUint::random(rng);
        Self::from_montgomery_unchecked(monty::montgomery_reduce(&lo, &hi, &MOD::PARAMS))
    }

    /// Field addition.
    pub fn add(&self, rhs: &Self) -> Self {
        Self::from_montgomery_unchecked(monty::add_mod(&self.value, &rhs.value, &MOD::PARAMS))
    }

    /// Field subtraction.
    pub fn sub(&self, rhs: &Self) -> Self {
        Self::from_montgomery_unchecked(monty::sub_mod(&self.value, &rhs.value, &MOD::PARAMS))
    }

    /// Field multiplication.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::from_montgomery_unchecked(monty::mul_mont(&self.value, &rhs.value, &MOD::PARAMS))
    }

    /// Field squaring.
    pub fn square(&self) -> Self {
        Self::from_montgomery_unchecked(monty::square_mont(&self.value, &MOD::PARAMS))
    }

    /// Doubling.
    pub fn double(&self) -> Self {
        Self::from_montgomery_unchecked(monty::double_mod(&self.value, &MOD::PARAMS))
    }

    /// Multiplication by `2^k` for a small public `k`, as repeated
    /// doublings. Covers the x2/x4/x8 factors in curve formulas.
    pub fn shl(&self, k: usize) -> Self {
        Self::from_montgomery_unchecked(monty::shl_mod(&self.value, k, &MOD::PARAMS))
    }

    /// Negation: `p - a`, staying in Montgomery form; `-0 = 0`.
    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// The multiplicative inverse via Fermat's little theorem,
    /// `a^(p - 2)`. Absent if any lane is zero.
    pub fn invert(&self) -> CtOption<Self> {
        CtOption::new(self.invert_unchecked(), !self.is_zero_mask().any())
    }

    /// The Fermat inversion without the zero check; a zero lane quietly
    /// stays zero. For callers whose structure already rules zero out.
    pub fn invert_unchecked(&self) -> Self {
        Self::from_montgomery_unchecked(monty::pow_mont(
            &self.value,
            &MOD::PARAMS.fermat_exp,
            &MOD::PARAMS,
        ))
    }

    /// The square root, if every lane has one.
    ///
    /// Computes the candidate `a^((p + 1) / 4)` — the modulus is checked to
    /// be 3 mod 4 when its parameters are built — and verifies it by
    /// squaring. There is no upfront residuosity test: non-residues are
    /// discovered by the verification failing, and one failing lane makes
    /// the whole batch absent.
    pub fn sqrt(&self) -> CtOption<Self> {
        let candidate = Self::from_montgomery_unchecked(monty::pow_mont(
            &self.value,
            &MOD::PARAMS.sqrt_exp,
            &MOD::PARAMS,
        ));
        let verified = candidate.square().eq_mask(self).all();
        CtOption::new(candidate, verified)
    }

    /// Raises to a public exponent. Vartime in the exponent; see
    /// [`monty::pow_mont`].
    pub fn pow_vartime(&self, exponent: &Uint<LIMBS>) -> Self {
        Self::from_montgomery_unchecked(monty::pow_mont(&self.value, exponent, &MOD::PARAMS))
    }

    /// Per-lane zero test.
    pub fn is_zero_mask(&self) -> LaneMask<LANES> {
        self.value.eq_mask(&WideUint::ZERO)
    }

    /// Per-lane equality.
    pub fn eq_mask(&self, rhs: &Self) -> LaneMask<LANES> {
        self.value.eq_mask(&rhs.value)
    }

    /// Per-lane blend: `a` where the mask is false, `b` where it is true.
    pub fn select(mask: &LaneMask<LANES>, a: &Self, b: &Self) -> Self {
        Self::from_montgomery_unchecked(WideUint::select(mask, &a.value, &b.value))
    }

    /// Per-lane conditional exchange.
    pub fn swap(mask: &LaneMask<LANES>, a: &mut Self, b: &mut Self) {
        WideUint::swap(mask, &mut a.value, &mut b.value);
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> Default
    for FieldElement<MOD, LIMBS, LANES>
{
    fn default() -> Self {
        Self::ZERO
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> DefaultIsZeroes
    for FieldElement<MOD, LIMBS, LANES>
{
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConstantTimeEq
    for FieldElement<MOD, LIMBS, LANES>
{
    fn ct_eq(&self, other: &Self) -> Choice {
        self.value.ct_eq(&other.value)
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> ConditionallySelectable
    for FieldElement<MOD, LIMBS, LANES>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_montgomery_unchecked(WideUint::conditional_select(&a.value, &b.value, choice))
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> PartialEq
    for FieldElement<MOD, LIMBS, LANES>
{
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> Eq
    for FieldElement<MOD, LIMBS, LANES>
{
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> fmt::Debug
    for FieldElement<MOD, LIMBS, LANES>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:?})", self.value)
    }
}

macro_rules! impl_binop {
    ($op:ident, $func:ident) => {
        impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> $op
            for FieldElement<MOD, LIMBS, LANES>
        {
            type Output = Self;

            fn $func(self, rhs: Self) -> Self {
                FieldElement::$func(&self, &rhs)
            }
        }

        impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize>
            $op<&FieldElement<MOD, LIMBS, LANES>> for FieldElement<MOD, LIMBS, LANES>
        {
            type Output = Self;

            fn $func(self, rhs: &Self) -> Self {
                FieldElement::$func(&self, rhs)
            }
        }

        impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize>
            $op<&FieldElement<MOD, LIMBS, LANES>> for &FieldElement<MOD, LIMBS, LANES>
        {
            type Output = FieldElement<MOD, LIMBS, LANES>;

            fn $func(self, rhs: &FieldElement<MOD, LIMBS, LANES>) -> Self::Output {
                FieldElement::$func(self, rhs)
            }
        }
    };
}

impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> AddAssign
    for FieldElement<MOD, LIMBS, LANES>
{
    fn add_assign(&mut self, rhs: Self) {
        *self = FieldElement::add(self, &rhs);
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> SubAssign
    for FieldElement<MOD, LIMBS, LANES>
{
    fn sub_assign(&mut self, rhs: Self) {
        *self = FieldElement::sub(self, &rhs);
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> MulAssign
    for FieldElement<MOD, LIMBS, LANES>
{
    fn mul_assign(&mut self, rhs: Self) {
        *self = FieldElement::mul(self, &rhs);
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> Neg
    for FieldElement<MOD, LIMBS, LANES>
{
    type Output = Self;

    fn neg(self) -> Self {
        FieldElement::neg(&self)
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> Sum
    for FieldElement<MOD, LIMBS, LANES>
{
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<MOD: FieldParams<LIMBS>, const LIMBS: usize, const LANES: usize> Product
    for FieldElement<MOD, LIMBS, LANES>
{
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldElement;
    use crate::params::{FieldParams, MontyParams};
    use proptest::prelude::*;
    use subtle::ConstantTimeEq;
    use widebn::{U256, WideUint};

    /// The secp256k1 field prime, as in the Montgomery layer tests.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    struct K256Field;

    impl FieldParams<4> for K256Field {
        const PARAMS: MontyParams<4> = MontyParams::new(U256::from_be_hex(
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
        ));
    }

    type Fe = FieldElement<K256Field, 4, 4>;

    fn fe(hex: &str) -> Fe {
        Fe::broadcast_uint(&U256::from_be_hex(hex))
    }

    #[test]
    fn identities() {
        assert_eq!(Fe::ZERO + Fe::ZERO, Fe::ZERO);
        assert_eq!(Fe::ONE * Fe::ONE, Fe::ONE);
        assert_eq!(Fe::ONE + Fe::ZERO, Fe::ONE);
        assert_eq!(*Fe::ONE.to_uints().lane(0), U256::ONE);
    }

    #[test]
    fn known_inverse() {
        let a = fe("ffffffffffffffffffffff000000000000000000000000000000000000000004");
        let inv = a.invert().unwrap();
        assert_eq!(
            *inv.to_uints().lane(0),
            U256::from_be_hex("dc1b98237fd316f9aee7342e6dc7629a75a99a9e9ef591170282ce3e1d8e26ed")
        );
        assert_eq!(inv * a, Fe::ONE);
    }

    #[test]
    fn zero_has_no_inverse() {
        assert!(bool::from(Fe::ZERO.invert().is_none()));
    }

    #[test]
    fn known_sqrt() {
        let a = fe("b560fd7b259468b53c3a1623f35786a491fcb1fcdfbb0165da4dccce1f185b60");
        let root = a.sqrt().unwrap();
        assert_eq!(
            *root.to_uints().lane(0),
            U256::from_be_hex("a59f1be7c1f892ff2adf14187e9cff7666112af579bc1a11b63e248098567e71")
        );
        assert_eq!(root.square(), a);
    }

    #[test]
    fn nonresidue_has_no_sqrt() {
        // A residue r has (-r) as a non-residue for p = 3 mod 4.
        let a = fe("b560fd7b259468b53c3a1623f35786a491fcb1fcdfbb0165da4dccce1f185b60");
        assert!(bool::from(a.sqrt().is_some()));
        assert!(bool::from(a.neg().sqrt().is_none()));
    }

    #[test]
    fn opposite_cancels() {
        let a = fe("b560fd7b259468b53c3a1623f35786a491fcb1fcdfbb0165da4dccce1f185b60");
        assert_eq!(a + a.neg(), Fe::ZERO);
        assert_eq!(-Fe::ZERO, Fe::ZERO);
    }

    #[test]
    fn out_of_range_rejected() {
        let too_big = WideUint::<4, 4>::broadcast(U256::MAX);
        assert!(bool::from(Fe::from_uints_checked(&too_big).is_none()));
        let fine = WideUint::<4, 4>::broadcast(U256::ONE);
        assert!(bool::from(Fe::from_uints_checked(&fine).is_some()));
    }

    prop_compose! {
        fn field_element()(w in any::<[u64; 4]>()) -> Fe {
            Fe::from_uints(&WideUint::broadcast(
                U256::from_words(w).sub_if_above(K256Field::PARAMS.modulus(), 0),
            ))
        }
    }

    proptest! {
        #[test]
        fn mul_commutes_and_distributes(a in field_element(), b in field_element(), c in field_element()) {
            prop_assert_eq!(a * b, b * a);
            prop_assert_eq!(a * (b + c), a * b + a * c);
        }

        #[test]
        fn inversion_round_trips(a in field_element()) {
            prop_assume!(!bool::from(a.ct_eq(&Fe::ZERO)));
            let inv = a.invert().unwrap();
            prop_assert_eq!(inv * a, Fe::ONE);
        }

        #[test]
        fn square_roots_square_back(a in field_element()) {
            let sq = a.square();
            let root = sq.sqrt().unwrap();
            // The root may be either of ±a.
            prop_assert!(root == a || root == a.neg());
        }
    }
}
