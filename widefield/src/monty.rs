//! Montgomery-domain modular arithmetic over lane batches.
//!
//! Values here are residues scaled by `R = 2^(64 * LIMBS)`: a Montgomery
//! value `m` represents the classical value `m * R^-1 mod p`. Every
//! function keeps the layer invariant that inputs and outputs are fully
//! reduced (`< p`), so a single conditional correction suffices after each
//! operation.

use widebn::{Uint, WideUint, adc, mac};

use crate::params::MontyParams;

/// Montgomery reduction of a double-width value, word by word.
///
/// The general algorithm (Handbook of Applied Cryptography, Algorithm
/// 14.32):
///
/// ```text
/// A <- input (2n b-limbs)
/// for i in 0..n {
///     k <- A[i] p' mod b
///     A <- A + k p b^i
/// }
/// A <- A / b^n
/// if A >= p {
///     A <- A - p
/// }
/// ```
///
/// Each round zeroes limb `i` of the accumulator; the surviving carry out
/// of column `i + n` is threaded through `meta_carry` into the next round,
/// and the final one feeds the conditional subtraction as an external
/// carry. The loop bounds are the limb count — never the data.
pub fn montgomery_reduce<const LIMBS: usize, const LANES: usize>(
    lo: &WideUint<LIMBS, LANES>,
    hi: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let mut lanes = [Uint::ZERO; LANES];
    for i in 0..LANES {
        lanes[i] = reduce_lane(lo.lane(i), hi.lane(i), params);
    }
    WideUint::from_lanes(lanes)
}

fn reduce_lane<const LIMBS: usize>(
    lo: &Uint<LIMBS>,
    hi: &Uint<LIMBS>,
    params: &MontyParams<LIMBS>,
) -> Uint<LIMBS> {
    let m = params.modulus.as_words();
    let mut lo = lo.to_words();
    let mut hi = hi.to_words();

    let mut meta_carry = 0;
    for i in 0..LIMBS {
        let u = lo[i].wrapping_mul(params.mod_neg_inv);

        // Column i becomes zero by choice of u; only its carry matters.
        let (_, mut carry) = mac(lo[i], u, m[0], 0);
        for j in 1..LIMBS {
            let k = i + j;
            if k < LIMBS {
                let (w, c) = mac(lo[k], u, m[j], carry);
                lo[k] = w;
                carry = c;
            } else {
                let (w, c) = mac(hi[k - LIMBS], u, m[j], carry);
                hi[k - LIMBS] = w;
                carry = c;
            }
        }
        let (w, c) = adc(hi[i], carry, meta_carry);
        hi[i] = w;
        meta_carry = c;
    }

    // The upper half is below 2p (plus the meta carry as bit 2^(64*LIMBS)),
    // so one conditional subtraction restores the invariant.
    Uint::from_words(hi).sub_if_above(&params.modulus, meta_carry)
}

/// Converts classical residues (`< p`) into Montgomery form.
pub fn to_montgomery<const LIMBS: usize, const LANES: usize>(
    value: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    mul_mont(value, &WideUint::broadcast(params.r2), params)
}

/// Converts Montgomery values back to classical residues.
pub fn from_montgomery<const LIMBS: usize, const LANES: usize>(
    value: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    montgomery_reduce(value, &WideUint::ZERO, params)
}

/// Montgomery product `a * b * R^-1 mod p`.
pub fn mul_mont<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    b: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let (lo, hi) = a.mul_wide(b);
    montgomery_reduce(&lo, &hi, params)
}

/// Montgomery square, via the symmetric multiply.
pub fn square_mont<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let (lo, hi) = a.square_wide();
    montgomery_reduce(&lo, &hi, params)
}

/// Modular addition. Operands are reduced, so the sum is at most one
/// modulus over range (counting the carry bit) and a single conditional
/// subtraction corrects it.
pub fn add_mod<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    b: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let (sum, carry) = a.carrying_add(b);
    sum.sub_if_above(&params.modulus, &carry)
}

/// Modular subtraction: lanes that borrow get one modulus added back,
/// selected by the borrow mask.
pub fn sub_mod<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    b: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let (diff, borrow) = a.borrowing_sub(b);
    let mut lanes = [Uint::ZERO; LANES];
    for i in 0..LANES {
        let correction = params.modulus.and_mask(borrow.as_words()[i]);
        lanes[i] = diff.lane(i).carrying_add(&correction, 0).0;
    }
    WideUint::from_lanes(lanes)
}

/// Modular doubling: shift plus one conditional subtraction.
pub fn double_mod<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let (shifted, carry) = a.shl1();
    shifted.sub_if_above(&params.modulus, &carry)
}

/// `a * 2^k mod p` as `k` repeated doublings; `k` is a public constant
/// (the small multiples appearing in curve formulas).
pub fn shl_mod<const LIMBS: usize, const LANES: usize>(
    a: &WideUint<LIMBS, LANES>,
    k: usize,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let mut acc = *a;
    for _ in 0..k {
        acc = double_mod(&acc, params);
    }
    acc
}

/// Montgomery exponentiation, most-significant bit first, skipping the
/// exponent's leading zeros.
///
/// **Not constant-time in the exponent.** The exponent here is always a
/// public, modulus-derived constant (Fermat inversion, square roots) —
/// never a secret scalar. Secret exponents have no business in this
/// function.
pub fn pow_mont<const LIMBS: usize, const LANES: usize>(
    base: &WideUint<LIMBS, LANES>,
    exponent: &Uint<LIMBS>,
    params: &MontyParams<LIMBS>,
) -> WideUint<LIMBS, LANES> {
    let mut result = WideUint::broadcast(params.one);
    let mut seen = false;
    for i in (0..LIMBS).rev() {
        let limb = exponent.as_words()[i];
        for b in (0..64).rev() {
            if seen {
                result = square_mont(&result, params);
            }
            if (limb >> b) & 1 == 1 {
                if seen {
                    result = mul_mont(&result, base, params);
                } else {
                    result = *base;
                    seen = true;
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{
        add_mod, from_montgomery, montgomery_reduce, mul_mont, pow_mont, shl_mod, square_mont,
        sub_mod, to_montgomery,
    };
    use crate::params::MontyParams;
    use num_bigint::BigUint;
    use proptest::prelude::*;
    use widebn::{U256, WideUint};

    // The secp256k1 field prime: also 3 mod 4, and deliberately not the
    // prime the curve layers use, to keep this layer honest about being
    // generic in the modulus.
    const P: MontyParams<4> = MontyParams::new(U256::from_be_hex(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
    ));

    fn p_big() -> BigUint {
        to_big(P.modulus())
    }

    fn to_big(x: &U256) -> BigUint {
        let mut bytes = [0u8; 32];
        x.write_be_bytes(&mut bytes);
        BigUint::from_bytes_be(&bytes)
    }

    fn from_big(x: &BigUint) -> U256 {
        let bytes = x.to_bytes_be();
        let mut buf = [0u8; 32];
        buf[32 - bytes.len()..].copy_from_slice(&bytes);
        U256::from_be_slice(&buf)
    }

    fn reduced(words: [u64; 4]) -> U256 {
        U256::from_words(words).sub_if_above(P.modulus(), 0)
    }

    #[test]
    fn round_trip_through_montgomery_form() {
        let values = [
            U256::ZERO,
            U256::ONE,
            U256::from_be_hex("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"),
            U256::from_be_hex("0168db3a8eca3fd7d4d08943182e189aef318068ba8853d77cb49c17bae00c0e"),
            U256::from_be_hex("a3fc64fece6f3e1effab4045a9a54faa49a228f787025f0ecb761145755cb2d0"),
        ];
        for v in values {
            let wide = WideUint::<4, 4>::broadcast(v);
            let back = from_montgomery(&to_montgomery(&wide, &P), &P);
            assert_eq!(back, wide);
        }
    }

    #[test]
    fn reduce_of_padded_value_divides_by_r() {
        // REDC(x) = x * R^-1 mod p.
        let x = U256::from_be_hex("00000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let wide = WideUint::<4, 2>::broadcast(x);
        let got = montgomery_reduce(&wide, &WideUint::ZERO, &P);
        let r: BigUint = BigUint::from(1u8) << 256;
        let r_inv = r.modpow(&(p_big() - 2u8), &p_big());
        let want = from_big(&(to_big(&x) * r_inv % p_big()));
        assert_eq!(*got.lane(0), want);
        assert_eq!(*got.lane(1), want);
    }

    #[test]
    fn pow_known_answers() {
        let a = U256::from_be_hex("ffffffffffffffffffffff000000000000000000000000000000000000000004");
        let ma = to_montgomery(&WideUint::<4, 4>::broadcast(a), &P);

        // Exponent 0 gives one.
        let r = from_montgomery(&pow_mont(&ma, &U256::ZERO, &P), &P);
        assert_eq!(*r.lane(0), U256::ONE);

        // a^2.
        let r = from_montgomery(&pow_mont(&ma, &U256::from_u64(2), &P), &P);
        assert_eq!(
            *r.lane(0),
            U256::from_be_hex("fffffffffffffdfffff85600000000000001000003d10001000007a9000eab68")
        );

        // A sparse exponent exercising the leading-zero skip.
        let e = U256::from_be_hex("00000000000f0000000000000000000000000000000000000000000000000001");
        let r = from_montgomery(&pow_mont(&ma, &e, &P), &P);
        assert_eq!(
            *r.lane(0),
            U256::from_be_hex("a51e978903ca7fcd788382ff283366ad7457d27c7aac417127a8723626773516")
        );

        // a^(p - 2) is the inverse.
        let e = U256::from_be_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2d");
        let r = from_montgomery(&pow_mont(&ma, &e, &P), &P);
        assert_eq!(
            *r.lane(0),
            U256::from_be_hex("dc1b98237fd316f9aee7342e6dc7629a75a99a9e9ef591170282ce3e1d8e26ed")
        );
    }

    #[test]
    fn add_sub_known_answers() {
        let a = U256::from_be_hex("ffffffffffffffffffffff000000000000000000000000000000000000000004");
        let b = U256::from_be_hex("ffffffffffffffffffffff000000000000000000000000000000000000000005");
        let ma = to_montgomery(&WideUint::<4, 4>::broadcast(a), &P);
        let mb = to_montgomery(&WideUint::<4, 4>::broadcast(b), &P);

        let sum = from_montgomery(&add_mod(&ma, &mb, &P), &P);
        assert_eq!(
            *sum.lane(0),
            U256::from_be_hex("fffffffffffffffffffffe0000000000000000000000000000000001000003da")
        );

        let diff = from_montgomery(&sub_mod(&ma, &mb, &P), &P);
        assert_eq!(
            *diff.lane(0),
            U256::from_be_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e")
        );

        let diff = from_montgomery(&sub_mod(&mb, &ma, &P), &P);
        assert_eq!(*diff.lane(0), U256::ONE);
    }

    proptest! {
        #[test]
        fn mul_matches_reference(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = reduced(a);
            let b = reduced(b);
            let ma = to_montgomery(&WideUint::<4, 2>::broadcast(a), &P);
            let mb = to_montgomery(&WideUint::<4, 2>::broadcast(b), &P);
            let got = from_montgomery(&mul_mont(&ma, &mb, &P), &P);
            let want = from_big(&(to_big(&a) * to_big(&b) % p_big()));
            prop_assert_eq!(*got.lane(0), want);
            prop_assert_eq!(*got.lane(1), want);
        }

        #[test]
        fn square_matches_mul(a in any::<[u64; 4]>()) {
            let a = to_montgomery(&WideUint::<4, 2>::broadcast(reduced(a)), &P);
            prop_assert_eq!(square_mont(&a, &P), mul_mont(&a, &a, &P));
        }

        #[test]
        fn add_then_sub_round_trips(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let a = to_montgomery(&WideUint::<4, 2>::broadcast(reduced(a)), &P);
            let b = to_montgomery(&WideUint::<4, 2>::broadcast(reduced(b)), &P);
            prop_assert_eq!(sub_mod(&add_mod(&a, &b, &P), &b, &P), a);
        }

        #[test]
        fn shl_matches_repeated_add(a in any::<[u64; 4]>()) {
            let a = to_montgomery(&WideUint::<4, 2>::broadcast(reduced(a)), &P);
            let twice = add_mod(&a, &a, &P);
            prop_assert_eq!(shl_mod(&a, 1, &P), twice);
            let eight = shl_mod(&a, 3, &P);
            let want = add_mod(&add_mod(&twice, &twice, &P), &add_mod(&twice, &twice, &P), &P);
            prop_assert_eq!(eight, want);
        }
    }
}
