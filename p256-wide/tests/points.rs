//! Point representation behavior at the curve boundary.

use hex_literal::hex;
use p256_wide::{AffinePoint, FieldElement, JacobianPoint, generator, scalar_mul_single};
use subtle::ConstantTimeEq;
use widebn::{U256, WideUint};

#[test]
fn generator_satisfies_the_curve_equation() {
    let g: AffinePoint<4> = AffinePoint::generator();
    assert!(bool::from(g.is_on_curve()));
}

#[test]
fn decompression_from_x() {
    // Decompressing the generator's x recovers the generator (its y is the
    // principal square root for this curve).
    let g: AffinePoint<4> = AffinePoint::generator();
    let recovered = AffinePoint::from_x(&g.x).unwrap();
    assert_eq!(recovered, g);

    // x = 2 is not on P-256.
    let off = FieldElement::<4>::broadcast_uint(&U256::from_u64(2));
    assert!(bool::from(AffinePoint::from_x(&off).is_none()));
}

#[test]
fn jacobian_round_trip_preserves_points() {
    let five_g = scalar_mul_single(&U256::from_u64(5), &generator::<4>());
    let affine = five_g.to_affine();
    let lifted = JacobianPoint::from_affine(&affine);
    // The lift has Z = 1, so its coordinates are the affine ones.
    assert_eq!(lifted.to_affine(), affine);
    assert!(bool::from(lifted.z().ct_eq(&FieldElement::<4>::ONE)));
}

#[test]
fn field_element_byte_boundary() {
    // Values at or above the modulus are rejected lane-wise.
    let p = U256::from_be_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    assert!(bool::from(
        FieldElement::<4>::from_uints_checked(&WideUint::broadcast(p)).is_none()
    ));
    let (p_minus_1, _) = p.borrowing_sub(&U256::ONE, 0);
    let fe = FieldElement::<4>::from_uints_checked(&WideUint::broadcast(p_minus_1)).unwrap();
    let mut bytes = [0u8; 32];
    fe.to_uints().lane(0).write_be_bytes(&mut bytes);
    assert_eq!(
        bytes,
        hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffe")
    );
}

#[test]
fn negated_point_is_the_mirror_image() {
    let g = generator::<4>();
    let minus_g = g.neg();
    let a = g.to_affine();
    let b = minus_g.to_affine();
    assert_eq!(a.x, b.x);
    assert_eq!(b.y, a.y.neg());
}
