//! Fixed-width unsigned integers stored as little-endian limb arrays.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};
use zeroize::DefaultIsZeroes;

use crate::limb::{Word, adc, mac, sbb};

/// Fixed-width unsigned integer: `LIMBS` 64-bit limbs, little-endian by
/// significance. The width is fixed per instantiation and never changes;
/// overflow is only ever reported through carry/borrow outputs.
#[derive(Clone, Copy)]
pub struct Uint<const LIMBS: usize> {
    limbs: [Word; LIMBS],
}

/// 128-bit unsigned integer.
pub type U128 = Uint<2>;

/// 256-bit unsigned integer.
pub type U256 = Uint<4>;

/// 512-bit unsigned integer.
pub type U512 = Uint<8>;

impl<const LIMBS: usize> Uint<LIMBS> {
    /// The value `0`.
    pub const ZERO: Self = Self { limbs: [0; LIMBS] };

    /// The value `1`.
    pub const ONE: Self = Self::from_u64(1);

    /// The largest representable value.
    pub const MAX: Self = Self {
        limbs: [Word::MAX; LIMBS],
    };

    /// Total number of bits.
    pub const BITS: usize = LIMBS * 64;

    /// Creates an integer from a little-endian limb array.
    pub const fn from_words(limbs: [Word; LIMBS]) -> Self {
        Self { limbs }
    }

    /// Returns the little-endian limb array.
    pub const fn to_words(self) -> [Word; LIMBS] {
        self.limbs
    }

    /// Borrows the little-endian limb array.
    pub const fn as_words(&self) -> &[Word; LIMBS] {
        &self.limbs
    }

    /// Creates an integer from a single word.
    pub const fn from_u64(w: u64) -> Self {
        let mut limbs = [0; LIMBS];
        limbs[0] = w;
        Self { limbs }
    }

    /// Parses a big-endian hexadecimal string into an integer.
    ///
    /// The string must be exactly `LIMBS * 16` lowercase or uppercase hex
    /// digits; anything else fails compilation when used in a `const`
    /// context. Intended for curve/field constants, mirroring how such
    /// constants are conventionally written.
    pub const fn from_be_hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        assert!(
            bytes.len() == LIMBS * 16,
            "hex string does not match the integer width"
        );

        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < bytes.len() {
            let digit = match bytes[i] {
                c @ b'0'..=b'9' => (c - b'0') as Word,
                c @ b'a'..=b'f' => (c - b'a' + 10) as Word,
                c @ b'A'..=b'F' => (c - b'A' + 10) as Word,
                _ => panic!("invalid hex digit"),
            };
            // Digits arrive most significant first; limb order is the
            // reverse.
            let limb = LIMBS - 1 - i / 16;
            limbs[limb] = (limbs[limb] << 4) | digit;
            i += 1;
        }
        Self { limbs }
    }

    /// Decodes a big-endian byte slice. Panics unless the slice is exactly
    /// `LIMBS * 8` bytes; lengths here are public, fixed-size quantities.
    pub fn from_be_slice(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), LIMBS * 8, "byte slice length mismatch");
        let mut limbs = [0; LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut w = [0u8; 8];
            w.copy_from_slice(chunk);
            limbs[LIMBS - 1 - i] = Word::from_be_bytes(w);
        }
        Self { limbs }
    }

    /// Encodes into big-endian bytes. Panics unless `out` is exactly
    /// `LIMBS * 8` bytes.
    pub fn write_be_bytes(&self, out: &mut [u8]) {
        assert_eq!(out.len(), LIMBS * 8, "output buffer length mismatch");
        for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&self.limbs[LIMBS - 1 - i].to_be_bytes());
        }
    }

    /// Generates a uniformly random integer over the full width.
    pub fn random(rng: &mut impl rand_core::RngCore) -> Self {
        let mut limbs = [0; LIMBS];
        for limb in &mut limbs {
            *limb = rng.next_u64();
        }
        Self { limbs }
    }

    /// Adds `rhs` plus an incoming carry (`0` or `1`), rippling the carry
    /// across limbs. Returns the wrapped sum and the outgoing carry
    /// (`0` or `1`).
    pub const fn carrying_add(&self, rhs: &Self, mut carry: Word) -> (Self, Word) {
        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < LIMBS {
            let (w, c) = adc(self.limbs[i], rhs.limbs[i], carry);
            limbs[i] = w;
            carry = c;
            i += 1;
        }
        (Self { limbs }, carry)
    }

    /// Subtracts `rhs` plus an incoming borrow, rippling the borrow across
    /// limbs. Borrows are all-ones masks (see [`sbb`]); the outgoing borrow
    /// is all-ones iff the subtraction underflowed.
    pub const fn borrowing_sub(&self, rhs: &Self, mut borrow: Word) -> (Self, Word) {
        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < LIMBS {
            let (w, b) = sbb(self.limbs[i], rhs.limbs[i], borrow);
            limbs[i] = w;
            borrow = b;
            i += 1;
        }
        (Self { limbs }, borrow)
    }

    /// Wrapping addition, discarding the carry.
    pub const fn wrapping_add(&self, rhs: &Self) -> Self {
        self.carrying_add(rhs, 0).0
    }

    /// Wrapping subtraction, discarding the borrow.
    pub const fn wrapping_sub(&self, rhs: &Self) -> Self {
        self.borrowing_sub(rhs, 0).0
    }

    /// Subtracts `p` once if `self >= p`, or unconditionally if `forced`
    /// (`0` or `1`) signals an external carry out of a preceding addition.
    /// Branch-free: the outcome is chosen with a whole-word mask.
    ///
    /// This is the single-step normalization used after modular additions,
    /// doublings, and Montgomery reduction; operands there are at most one
    /// modulus over range, so one conditional subtraction restores
    /// `0 <= value < p`.
    pub const fn sub_if_above(&self, p: &Self, forced: Word) -> Self {
        let (diff, borrow) = self.borrowing_sub(p, 0);
        // Keep the subtracted value when it did not underflow, or when the
        // external carry means the true (wider) value is above `p` anyway.
        let keep_diff = !borrow | forced.wrapping_neg();
        Self::mask_select(self, &diff, keep_diff)
    }

    /// Keeps `self` masked: each limb ANDed with `mask`.
    pub const fn and_mask(&self, mask: Word) -> Self {
        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < LIMBS {
            limbs[i] = self.limbs[i] & mask;
            i += 1;
        }
        Self { limbs }
    }

    /// Returns `a` when `mask` is zero and `b` when `mask` is all-ones.
    pub(crate) const fn mask_select(a: &Self, b: &Self, mask: Word) -> Self {
        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < LIMBS {
            limbs[i] = a.limbs[i] ^ ((a.limbs[i] ^ b.limbs[i]) & mask);
            i += 1;
        }
        Self { limbs }
    }

    /// Schoolbook multiplication producing the full double-width product as
    /// a `(lo, hi)` pair of same-width integers.
    pub const fn mul_wide(&self, rhs: &Self) -> (Self, Self) {
        let mut lo = [0; LIMBS];
        let mut hi = [0; LIMBS];

        let mut i = 0;
        while i < LIMBS {
            let mut carry = 0;
            let mut j = 0;
            while j < LIMBS {
                let k = i + j;
                if k < LIMBS {
                    let (w, c) = mac(lo[k], self.limbs[i], rhs.limbs[j], carry);
                    lo[k] = w;
                    carry = c;
                } else {
                    let (w, c) = mac(hi[k - LIMBS], self.limbs[i], rhs.limbs[j], carry);
                    hi[k - LIMBS] = w;
                    carry = c;
                }
                j += 1;
            }
            // Column `i + LIMBS` has not been touched yet for this `i`.
            hi[i] = carry;
            i += 1;
        }

        (Self { limbs: lo }, Self { limbs: hi })
    }

    /// Squaring via the symmetric schoolbook: off-diagonal products are
    /// computed once and doubled, roughly halving the multiply count
    /// relative to [`Self::mul_wide`].
    pub const fn square_wide(&self) -> (Self, Self) {
        let mut lo = [0; LIMBS];
        let mut hi = [0; LIMBS];

        // Off-diagonal products limb[i] * limb[j] for j < i, each once.
        let mut i = 1;
        while i < LIMBS {
            let mut carry = 0;
            let mut j = 0;
            while j < i {
                let k = i + j;
                if k < LIMBS {
                    let (w, c) = mac(lo[k], self.limbs[i], self.limbs[j], carry);
                    lo[k] = w;
                    carry = c;
                } else {
                    let (w, c) = mac(hi[k - LIMBS], self.limbs[i], self.limbs[j], carry);
                    hi[k - LIMBS] = w;
                    carry = c;
                }
                j += 1;
            }
            // Column `2i` is still untouched when row `i` finishes.
            if 2 * i < LIMBS {
                lo[2 * i] = carry;
            } else {
                hi[2 * i - LIMBS] = carry;
            }
            i += 1;
        }

        // Double the off-diagonal half. The top bit shifted out is always
        // zero: twice the off-diagonal sum is bounded by the full square.
        let mut top = 0;
        let mut k = 0;
        while k < LIMBS {
            let w = lo[k];
            lo[k] = (w << 1) | top;
            top = w >> 63;
            k += 1;
        }
        k = 0;
        while k < LIMBS {
            let w = hi[k];
            hi[k] = (w << 1) | top;
            top = w >> 63;
            k += 1;
        }

        // Add the diagonal squares, one per column pair, with the carry
        // chain threaded through.
        let mut carry = 0;
        let mut i = 0;
        while i < LIMBS {
            let (c0, c1) = (2 * i, 2 * i + 1);
            let hi_part = if c0 < LIMBS {
                let (w, h) = mac(lo[c0], self.limbs[i], self.limbs[i], carry);
                lo[c0] = w;
                h
            } else {
                let (w, h) = mac(hi[c0 - LIMBS], self.limbs[i], self.limbs[i], carry);
                hi[c0 - LIMBS] = w;
                h
            };
            if c1 < LIMBS {
                let (w, c) = adc(lo[c1], hi_part, 0);
                lo[c1] = w;
                carry = c;
            } else {
                let (w, c) = adc(hi[c1 - LIMBS], hi_part, 0);
                hi[c1 - LIMBS] = w;
                carry = c;
            }
            i += 1;
        }

        (Self { limbs: lo }, Self { limbs: hi })
    }

    /// Shifts left by one bit, returning the shifted value and the bit
    /// carried out (`0` or `1`).
    pub const fn shl1(&self) -> (Self, Word) {
        let mut limbs = [0; LIMBS];
        let mut carry = 0;
        let mut i = 0;
        while i < LIMBS {
            limbs[i] = (self.limbs[i] << 1) | carry;
            carry = self.limbs[i] >> 63;
            i += 1;
        }
        (Self { limbs }, carry)
    }

    /// Shifts right by two bits, dropping the bits shifted out. Used for
    /// modulus-derived exponent constants.
    pub const fn shr2(&self) -> Self {
        let mut limbs = [0; LIMBS];
        let mut i = 0;
        while i < LIMBS {
            limbs[i] = self.limbs[i] >> 2;
            if i + 1 < LIMBS {
                limbs[i] |= self.limbs[i + 1] << 62;
            }
            i += 1;
        }
        Self { limbs }
    }

    /// Extracts bit `index` (little-endian numbering) as a [`Choice`].
    pub fn bit(&self, index: usize) -> Choice {
        debug_assert!(index < Self::BITS);
        Choice::from(((self.limbs[index / 64] >> (index % 64)) & 1) as u8)
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Whether the low bit is set.
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.limbs[0] & 1) as u8)
    }
}

impl<const LIMBS: usize> Default for Uint<LIMBS> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const LIMBS: usize> DefaultIsZeroes for Uint<LIMBS> {}

impl<const LIMBS: usize> ConditionallySelectable for Uint<LIMBS> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0; LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = Word::conditional_select(&a.limbs[i], &b.limbs[i], choice);
        }
        Self { limbs }
    }
}

impl<const LIMBS: usize> ConstantTimeEq for Uint<LIMBS> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = 0;
        for i in 0..LIMBS {
            acc |= self.limbs[i] ^ other.limbs[i];
        }
        // Fold the accumulated difference into a single bit.
        Choice::from((((acc | acc.wrapping_neg()) >> 63) ^ 1) as u8)
    }
}

impl<const LIMBS: usize> ConstantTimeGreater for Uint<LIMBS> {
    fn ct_gt(&self, other: &Self) -> Choice {
        let (_, borrow) = other.borrowing_sub(self, 0);
        Choice::from((borrow & 1) as u8)
    }
}

impl<const LIMBS: usize> ConstantTimeLess for Uint<LIMBS> {
    fn ct_lt(&self, other: &Self) -> Choice {
        // The comparison is the subtraction borrow; no separate comparator.
        let (_, borrow) = self.borrowing_sub(other, 0);
        Choice::from((borrow & 1) as u8)
    }
}

impl<const LIMBS: usize> PartialEq for Uint<LIMBS> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const LIMBS: usize> Eq for Uint<LIMBS> {}

impl<const LIMBS: usize> fmt::Debug for Uint<LIMBS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint(0x")?;
        for limb in self.limbs.iter().rev() {
            write!(f, "{limb:016x}")?;
        }
        write!(f, ")")
    }
}
