// Copyright 2025 Irreducible Inc.
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use revarith_frontend::CircuitBuilder;

use super::*;
use crate::{
	reference::ExtField,
	testing::{builder, load, random_below},
};

const P: u32 = 863;

fn elem(re: u32, im: u32) -> classical::Fp2 {
	classical::Fp2::new(re, im)
}

fn loaded(b: &CircuitBuilder, f: &Fp2, v: &classical::Fp2) -> Fp2Elem {
	let e = f.allocate(b);
	f.load(b, &e, v);
	e
}

fn random_elem(rng: &mut StdRng) -> classical::Fp2 {
	let p = BigUint::from(P);
	classical::Fp2 {
		re: random_below(rng, &p),
		im: random_below(rng, &p),
	}
}

#[test]
fn test_mul_add_and_square_add() {
	let f = Fp2::new(P);
	let ext = ExtField::new(P);
	let mut rng = StdRng::seed_from_u64(3);
	for _ in 0..8 {
		let (x, y, a) = (random_elem(&mut rng), random_elem(&mut rng), random_elem(&mut rng));
		let b = builder();
		let xr = loaded(&b, &f, &x);
		let yr = loaded(&b, &f, &y);
		let acc = loaded(&b, &f, &a);
		f.mul_add(&b, &xr, &yr, &acc);
		assert_eq!(f.peek(&b, &acc), ext.add(&a, &ext.mul(&x, &y)));
		f.square_add(&b, &xr, &acc);
		let expected = ext.add(&ext.add(&a, &ext.mul(&x, &y)), &ext.sqr(&x));
		assert_eq!(f.peek(&b, &acc), expected);
		f.square_sub(&b, &xr, &acc);
		f.mul_sub(&b, &xr, &yr, &acc);
		assert_eq!(f.peek(&b, &acc), a);
		assert_eq!(f.peek(&b, &xr), x);
		assert_eq!(f.peek(&b, &yr), y);
		b.check().unwrap();
	}
}

#[test]
fn test_open_products_match_closed_forms() {
	let f = Fp2::new(P);
	let ext = ExtField::new(P);
	let window = 2;
	let x = elem(472, 100);
	let y = elem(767, 5);
	let b = builder();
	let xr = loaded(&b, &f, &x);
	let yr = loaded(&b, &f, &y);

	let out = f.allocate(&b);
	let scratch = b.allocate(f.mul_scratch_size(window));
	let pending = f.mul_open(&b, &xr, &yr, &out, &scratch, window);
	assert_eq!(f.peek(&b, &out), ext.mul(&x, &y));
	pending.close();
	assert_eq!(b.peek(&scratch), BigUint::ZERO);
	b.release(scratch);

	let scratch = b.allocate(f.square_scratch_size(window));
	let pending = f.square_open(&b, &xr, &out, &scratch, window);
	assert_eq!(f.peek(&b, &out), ext.sqr(&x));
	pending.close();
	assert_eq!(b.peek(&scratch), BigUint::ZERO);
	b.release(scratch);

	let scratch = b.allocate(f.invert_scratch_size(window));
	let pending = f.invert_open(&b, &xr, &out, &scratch, window);
	assert_eq!(f.peek(&b, &out), ext.inv(&x));
	pending.close();
	assert_eq!(b.peek(&scratch), BigUint::ZERO);
	assert_eq!(f.peek(&b, &out), classical::Fp2::zero());
	b.release(scratch);
	b.check().unwrap();
}

#[test]
fn test_invert_zero_both_directions() {
	let f = Fp2::new(P);
	let b = builder();
	let x = f.allocate(&b);
	let out = f.allocate(&b);
	f.invert(&b, &x, &out);
	assert!(f.peek(&b, &out).is_zero());
	b.adjoint(|b| f.invert(b, &x, &out));
	assert!(f.peek(&b, &out).is_zero());
	f.invert_add(&b, &x, &out);
	assert!(f.peek(&b, &out).is_zero());
	b.check().unwrap();
}

#[test]
#[should_panic(expected = "must be 3 mod 4")]
fn test_modulus_must_be_3_mod_4() {
	// 13 = 1 mod 4 has i = 5 with i² = -1.
	Fp2::new(13u32);
}

#[test]
fn test_predicated_invert() {
	let f = Fp2::new(P);
	let ext = ExtField::new(P);
	let x = elem(12, 700);
	for ctl in [0u32, 1] {
		let b = builder();
		let k = load(&b, 1, ctl);
		let xr = loaded(&b, &f, &x);
		let out = f.allocate(&b);
		let width_before = b.stat().width;
		b.with_control(k[0], |b| f.invert(b, &xr, &out));
		assert_eq!(b.stat().width, width_before);
		let expected = if ctl == 1 { ext.inv(&x) } else { classical::Fp2::zero() };
		assert_eq!(f.peek(&b, &out), expected);
		assert_eq!(f.peek(&b, &xr), x);
		b.check().unwrap();
	}
}

#[test]
fn test_invert_and_div() {
	let f = Fp2::new(P);
	let ext = ExtField::new(P);
	let x = elem(12, 700);
	let y = elem(3, 4);
	let b = builder();
	let xr = loaded(&b, &f, &x);
	let yr = loaded(&b, &f, &y);
	let out = f.allocate(&b);
	f.invert_add(&b, &xr, &out);
	assert_eq!(ext.mul(&f.peek(&b, &out), &x), classical::Fp2::one());
	b.adjoint(|b| f.invert_add(b, &xr, &out));
	f.div(&b, &xr, &yr, &out);
	assert_eq!(f.peek(&b, &out), ext.div(&y, &x));
	b.check().unwrap();
}

#[test]
fn test_linear_ops() {
	let f = Fp2::new(P);
	let ext = ExtField::new(P);
	let x = elem(860, 1);
	let y = elem(5, 862);
	let b = builder();
	let xr = loaded(&b, &f, &x);
	let yr = loaded(&b, &f, &y);
	f.add(&b, &xr, &yr);
	assert_eq!(f.peek(&b, &yr), ext.add(&x, &y));
	f.neg(&b, &xr);
	assert_eq!(f.peek(&b, &xr), ext.neg(&x));
	f.double(&b, &yr);
	f.halve(&b, &yr);
	f.sub(&b, &xr, &yr);
	assert_eq!(f.peek(&b, &yr), ext.add(&ext.add(&x, &y), &x));
	f.add_const(&b, &elem(2, 3), &yr);
	assert_eq!(f.peek(&b, &yr), ext.add(&ext.add(&ext.add(&x, &y), &x), &elem(2, 3)));
	b.check().unwrap();
}

#[test]
fn test_cswap() {
	let f = Fp2::new(P);
	let b = builder();
	let c = load(&b, 1, 1u32);
	let x = loaded(&b, &f, &elem(1, 2));
	let y = loaded(&b, &f, &elem(3, 4));
	f.cswap(&b, c[0], &x, &y);
	assert_eq!(f.peek(&b, &x), elem(3, 4));
	assert_eq!(f.peek(&b, &y), elem(1, 2));
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(16))]

	#[test]
	fn prop_predicated_mul_add(ctl in 0u32..2, re in 0u32..P, im in 0u32..P) {
		let f = Fp2::new(P);
		let ext = ExtField::new(P);
		let b = builder();
		let k = load(&b, 1, ctl);
		let x = elem(re, im);
		let xr = loaded(&b, &f, &x);
		let yr = loaded(&b, &f, &x);
		let acc = loaded(&b, &f, &elem(1, 1));
		b.with_control(k[0], |b| f.mul_add(b, &xr, &yr, &acc));
		let expected = if ctl == 1 { ext.add(&elem(1, 1), &ext.sqr(&x)) } else { elem(1, 1) };
		prop_assert_eq!(f.peek(&b, &acc), expected);
		prop_assert!(b.check().is_ok());
	}
}
