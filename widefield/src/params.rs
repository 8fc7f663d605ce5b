//! Per-modulus Montgomery parameters.

use core::fmt::Debug;

use widebn::{Uint, Word};

/// Immutable per-modulus context: the modulus and every constant derived
/// from it, computed once at compile time and passed by reference to the
/// arithmetic below. Nothing modulus-dependent lives anywhere else.
///
/// Construction enforces the static preconditions of the layers built on
/// top: the modulus must be odd (Montgomery reduction) and congruent to
/// 3 mod 4 (the square-root algorithm). A modulus violating either fails
/// const evaluation — configuration errors never reach runtime.
#[derive(Clone, Copy, Debug)]
pub struct MontyParams<const LIMBS: usize> {
    /// The prime modulus `p`.
    pub(crate) modulus: Uint<LIMBS>,
    /// `R mod p` where `R = 2^(64 * LIMBS)`; the Montgomery form of one.
    pub(crate) one: Uint<LIMBS>,
    /// `R^2 mod p`; multiplier for conversion into Montgomery form.
    pub(crate) r2: Uint<LIMBS>,
    /// `-p^-1 mod 2^64`; the per-word reduction constant.
    pub(crate) mod_neg_inv: Word,
    /// `p - 2`; Fermat inversion exponent.
    pub(crate) fermat_exp: Uint<LIMBS>,
    /// `(p + 1) / 4`; square-root exponent, valid since `p ≡ 3 (mod 4)`.
    pub(crate) sqrt_exp: Uint<LIMBS>,
}

impl<const LIMBS: usize> MontyParams<LIMBS> {
    /// Derives all parameters for `modulus`.
    pub const fn new(modulus: Uint<LIMBS>) -> Self {
        let words = modulus.as_words();
        assert!(words[0] & 1 == 1, "modulus must be odd");
        assert!(words[0] & 3 == 3, "modulus must be congruent to 3 mod 4");

        // -p^-1 mod 2^64 by Newton iteration; six rounds double the
        // precision past 64 bits.
        let mut inv: Word = 1;
        let mut i = 0;
        while i < 6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(words[0].wrapping_mul(inv)));
            i += 1;
        }
        let mod_neg_inv = inv.wrapping_neg();

        // R mod p by doubling 1 (already reduced, p >= 3) once per modulus
        // bit; continuing for another width's worth of bits yields
        // R^2 mod p.
        let mut one = Uint::ONE;
        let mut i = 0;
        while i < Uint::<LIMBS>::BITS {
            one = mod_double(&one, &modulus);
            i += 1;
        }
        let mut r2 = one;
        let mut i = 0;
        while i < Uint::<LIMBS>::BITS {
            r2 = mod_double(&r2, &modulus);
            i += 1;
        }

        let (fermat_exp, _) = modulus.borrowing_sub(&Uint::from_u64(2), 0);
        // With p = 4k + 3, (p + 1) / 4 = k + 1.
        let (sqrt_exp, _) = modulus.shr2().carrying_add(&Uint::ONE, 0);

        Self {
            modulus,
            one,
            r2,
            mod_neg_inv,
            fermat_exp,
            sqrt_exp,
        }
    }

    /// The modulus `p`.
    pub const fn modulus(&self) -> &Uint<LIMBS> {
        &self.modulus
    }

    /// `R mod p`, the Montgomery representation of one.
    pub const fn one(&self) -> &Uint<LIMBS> {
        &self.one
    }

    /// `R^2 mod p`.
    pub const fn r2(&self) -> &Uint<LIMBS> {
        &self.r2
    }

    /// `-p^-1 mod 2^64`.
    pub const fn mod_neg_inv(&self) -> Word {
        self.mod_neg_inv
    }
}

/// Doubles `a` modulo `p`; `a` must already be reduced.
const fn mod_double<const LIMBS: usize>(a: &Uint<LIMBS>, p: &Uint<LIMBS>) -> Uint<LIMBS> {
    let (shifted, carry) = a.shl1();
    shifted.sub_if_above(p, carry)
}

/// Binds a modulus to a marker type, so that field elements of different
/// moduli are different types. Implementations are zero-sized tags; the
/// actual data is the associated [`MontyParams`].
pub trait FieldParams<const LIMBS: usize>: Copy + Clone + Debug + Eq + 'static {
    /// The per-modulus parameter block.
    const PARAMS: MontyParams<LIMBS>;
}

#[cfg(test)]
mod tests {
    use super::MontyParams;
    use widebn::U256;

    const P256: &str = "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";

    #[test]
    fn p256_derived_constants() {
        const PARAMS: MontyParams<4> = MontyParams::new(U256::from_be_hex(
            "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        ));

        // R mod p and R^2 mod p for the P-256 field prime are documented in
        // the SP 800-186 arithmetic literature.
        assert_eq!(
            *PARAMS.one(),
            U256::from_be_hex("00000000fffffffeffffffffffffffffffffffff000000000000000000000001")
        );
        assert_eq!(
            *PARAMS.r2(),
            U256::from_be_hex("00000004fffffffdfffffffffffffffefffffffbffffffff0000000000000003")
        );
        // p' = -p^-1 mod 2^64; for this prime the low modulus word is
        // 2^64 - 1, so p^-1 ≡ -1 and p' = 1.
        assert_eq!(PARAMS.mod_neg_inv(), 1);

        assert_eq!(
            *PARAMS.modulus(),
            U256::from_be_hex(P256)
        );
    }

    #[test]
    fn exponent_constants() {
        const PARAMS: MontyParams<4> = MontyParams::new(U256::from_be_hex(
            "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        ));
        assert_eq!(
            PARAMS.fermat_exp,
            U256::from_be_hex("ffffffff00000001000000000000000000000000fffffffffffffffffffffffd")
        );
        assert_eq!(
            PARAMS.sqrt_exp,
            U256::from_be_hex("3fffffffc0000000400000000000000000000000400000000000000000000000")
        );
    }
}
