//! Lane batches of fixed-width integers.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use crate::limb::Word;
use crate::mask::LaneMask;
use crate::uint::Uint;

/// A batch of `LANES` independent [`Uint`]s processed per operation.
///
/// Lanes are mathematically independent: no operation ever propagates a
/// carry, borrow, or any other value across lanes. Every lane of every
/// operation executes the same fixed sequence of limb instructions, so one
/// call has one trace regardless of per-lane values.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct WideUint<const LIMBS: usize, const LANES: usize> {
    lanes: [Uint<LIMBS>; LANES],
}

impl<const LIMBS: usize, const LANES: usize> WideUint<LIMBS, LANES> {
    /// Zero in every lane.
    pub const ZERO: Self = Self {
        lanes: [Uint::ZERO; LANES],
    };

    /// Creates a batch from per-lane values.
    pub const fn from_lanes(lanes: [Uint<LIMBS>; LANES]) -> Self {
        Self { lanes }
    }

    /// Replicates one value into every lane.
    pub const fn broadcast(value: Uint<LIMBS>) -> Self {
        Self {
            lanes: [value; LANES],
        }
    }

    /// Borrows one lane.
    pub const fn lane(&self, i: usize) -> &Uint<LIMBS> {
        &self.lanes[i]
    }

    /// Borrows all lanes.
    pub const fn lanes(&self) -> &[Uint<LIMBS>; LANES] {
        &self.lanes
    }

    /// Decodes one big-endian byte string per lane.
    pub fn from_be_slices(bytes: &[&[u8]; LANES]) -> Self {
        let mut lanes = [Uint::ZERO; LANES];
        for (lane, chunk) in lanes.iter_mut().zip(bytes.iter()) {
            *lane = Uint::from_be_slice(chunk);
        }
        Self { lanes }
    }

    /// Generates independent uniformly random lanes.
    pub fn random(rng: &mut impl rand_core::RngCore) -> Self {
        let mut lanes = [Uint::ZERO; LANES];
        for lane in &mut lanes {
            *lane = Uint::random(rng);
        }
        Self { lanes }
    }

    /// Lane-wise addition; the returned mask is true for lanes that carried
    /// out.
    pub fn carrying_add(&self, rhs: &Self) -> (Self, LaneMask<LANES>) {
        let mut lanes = [Uint::ZERO; LANES];
        let mut carries = [0; LANES];
        for i in 0..LANES {
            let (sum, carry) = self.lanes[i].carrying_add(&rhs.lanes[i], 0);
            lanes[i] = sum;
            carries[i] = carry;
        }
        (Self { lanes }, LaneMask::from_carries(carries))
    }

    /// Lane-wise subtraction; the returned mask is true for lanes that
    /// borrowed.
    pub fn borrowing_sub(&self, rhs: &Self) -> (Self, LaneMask<LANES>) {
        let mut lanes = [Uint::ZERO; LANES];
        let mut borrows = [0; LANES];
        for i in 0..LANES {
            let (diff, borrow) = self.lanes[i].borrowing_sub(&rhs.lanes[i], 0);
            lanes[i] = diff;
            borrows[i] = borrow;
        }
        (Self { lanes }, LaneMask::from_raw(borrows))
    }

    /// Lane-wise [`Uint::sub_if_above`] against a shared modulus, with the
    /// external carry supplied per lane.
    pub fn sub_if_above(&self, p: &Uint<LIMBS>, forced: &LaneMask<LANES>) -> Self {
        let mut lanes = [Uint::ZERO; LANES];
        for i in 0..LANES {
            lanes[i] = self.lanes[i].sub_if_above(p, forced.lane(i) & 1);
        }
        Self { lanes }
    }

    /// Lane-wise double-width product as a `(lo, hi)` pair.
    pub fn mul_wide(&self, rhs: &Self) -> (Self, Self) {
        let mut lo = [Uint::ZERO; LANES];
        let mut hi = [Uint::ZERO; LANES];
        for i in 0..LANES {
            let (l, h) = self.lanes[i].mul_wide(&rhs.lanes[i]);
            lo[i] = l;
            hi[i] = h;
        }
        (Self { lanes: lo }, Self { lanes: hi })
    }

    /// Lane-wise double-width square.
    pub fn square_wide(&self) -> (Self, Self) {
        let mut lo = [Uint::ZERO; LANES];
        let mut hi = [Uint::ZERO; LANES];
        for i in 0..LANES {
            let (l, h) = self.lanes[i].square_wide();
            lo[i] = l;
            hi[i] = h;
        }
        (Self { lanes: lo }, Self { lanes: hi })
    }

    /// Lane-wise single-bit left shift; the mask is true for lanes whose top
    /// bit was carried out.
    pub fn shl1(&self) -> (Self, LaneMask<LANES>) {
        let mut lanes = [Uint::ZERO; LANES];
        let mut carries = [0; LANES];
        for i in 0..LANES {
            let (shifted, carry) = self.lanes[i].shl1();
            lanes[i] = shifted;
            carries[i] = carry;
        }
        (Self { lanes }, LaneMask::from_carries(carries))
    }

    /// Lane-wise `<` derived from the subtraction borrow.
    pub fn lt(&self, rhs: &Self) -> LaneMask<LANES> {
        self.borrowing_sub(rhs).1
    }

    /// Lane-wise `>`.
    pub fn gt(&self, rhs: &Self) -> LaneMask<LANES> {
        rhs.lt(self)
    }

    /// Lane-wise `<=`.
    pub fn le(&self, rhs: &Self) -> LaneMask<LANES> {
        !self.gt(rhs)
    }

    /// Lane-wise `>=`.
    pub fn ge(&self, rhs: &Self) -> LaneMask<LANES> {
        !self.lt(rhs)
    }

    /// Lane-wise equality.
    pub fn eq_mask(&self, rhs: &Self) -> LaneMask<LANES> {
        let mut lanes = [0; LANES];
        for i in 0..LANES {
            lanes[i] = (self.lanes[i].ct_eq(&rhs.lanes[i]).unwrap_u8() as Word).wrapping_neg();
        }
        LaneMask::from_raw(lanes)
    }

    /// Per-lane mask of bit `index` of each lane's value: all-ones where the
    /// bit is set. This is how secret scalar bits enter the select/swap
    /// machinery.
    pub fn bit_mask(&self, index: usize) -> LaneMask<LANES> {
        debug_assert!(index < Uint::<LIMBS>::BITS);
        let mut carries = [0; LANES];
        for i in 0..LANES {
            carries[i] = (self.lanes[i].as_words()[index / 64] >> (index % 64)) & 1;
        }
        LaneMask::from_carries(carries)
    }

    /// Per-lane blend: lane `i` of the result is `a`'s lane where the mask
    /// is false and `b`'s lane where it is true. Bitwise, no branches.
    pub fn select(mask: &LaneMask<LANES>, a: &Self, b: &Self) -> Self {
        let mut lanes = [Uint::ZERO; LANES];
        for i in 0..LANES {
            lanes[i] = Uint::mask_select(&a.lanes[i], &b.lanes[i], mask.lane(i));
        }
        Self { lanes }
    }

    /// Per-lane conditional exchange: lanes where the mask is true are
    /// swapped between `a` and `b`, lanes where it is false are untouched.
    /// Implemented as a masked XOR blend; the memory access pattern is
    /// identical for every mask value.
    pub fn swap(mask: &LaneMask<LANES>, a: &mut Self, b: &mut Self) {
        for i in 0..LANES {
            let m = mask.lane(i);
            let aw = a.lanes[i].to_words();
            let bw = b.lanes[i].to_words();
            let mut na = [0; LIMBS];
            let mut nb = [0; LIMBS];
            for j in 0..LIMBS {
                let t = (aw[j] ^ bw[j]) & m;
                na[j] = aw[j] ^ t;
                nb[j] = bw[j] ^ t;
            }
            a.lanes[i] = Uint::from_words(na);
            b.lanes[i] = Uint::from_words(nb);
        }
    }
}

impl<const LIMBS: usize, const LANES: usize> Default for WideUint<LIMBS, LANES> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const LIMBS: usize, const LANES: usize> DefaultIsZeroes for WideUint<LIMBS, LANES> {}

impl<const LIMBS: usize, const LANES: usize> ConstantTimeEq for WideUint<LIMBS, LANES> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = Choice::from(1);
        for i in 0..LANES {
            acc &= self.lanes[i].ct_eq(&other.lanes[i]);
        }
        acc
    }
}

impl<const LIMBS: usize, const LANES: usize> ConditionallySelectable for WideUint<LIMBS, LANES> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut lanes = [Uint::ZERO; LANES];
        for i in 0..LANES {
            lanes[i] = Uint::conditional_select(&a.lanes[i], &b.lanes[i], choice);
        }
        Self { lanes }
    }
}

impl<const LIMBS: usize, const LANES: usize> fmt::Debug for WideUint<LIMBS, LANES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}
