// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use revarith_frontend::{CircuitBuilder, Options};

use super::*;
use crate::{
	reference,
	testing::{builder, load, random_below},
};

fn big(v: u64) -> BigUint {
	BigUint::from(v)
}

fn loaded(b: &CircuitBuilder, zm: &ZMod, v: u64) -> Register {
	let reg = zm.allocate(b);
	zm.load(b, &reg, &big(v));
	reg
}

#[test]
fn test_mul_add_scenario_mod_13() {
	for form in [Form::Plain, Form::Montgomery] {
		let b = builder();
		let zm = ZMod::new(13u32, form);
		let x = loaded(&b, &zm, 4);
		let y = loaded(&b, &zm, 5);
		let acc = loaded(&b, &zm, 2);
		zm.mul_add(&b, &x, &y, &acc);
		assert_eq!(zm.decode(&b.peek(&acc)), big(9), "{form:?}");
		assert_eq!(zm.decode(&b.peek(&x)), big(4));
		assert_eq!(zm.decode(&b.peek(&y)), big(5));
		b.check().unwrap();
	}
}

#[test]
fn test_add_sub_exhaustive_mod_13() {
	let zm = ZMod::new(13u32, Form::Plain);
	for x in 0..13u64 {
		for y in 0..13u64 {
			let b = builder();
			let xr = loaded(&b, &zm, x);
			let yr = loaded(&b, &zm, y);
			zm.add(&b, &xr, &yr);
			assert_eq!(b.peek(&yr), big((x + y) % 13), "{x} + {y}");
			zm.sub(&b, &xr, &yr);
			zm.sub(&b, &xr, &yr);
			assert_eq!(b.peek(&yr), big((y + 13 - x) % 13), "{y} - {x}");
			assert_eq!(b.peek(&xr), big(x));
			b.check().unwrap();
		}
	}
}

#[test]
fn test_neg_double_halve_exhaustive_mod_13() {
	let zm = ZMod::new(13u32, Form::Plain);
	for x in 0..13u64 {
		let b = builder();
		let r = loaded(&b, &zm, x);
		zm.neg(&b, &r);
		assert_eq!(b.peek(&r), big((13 - x) % 13), "-{x}");
		zm.neg(&b, &r);
		zm.double(&b, &r);
		assert_eq!(b.peek(&r), big(2 * x % 13), "2·{x}");
		zm.halve(&b, &r);
		zm.halve(&b, &r);
		assert_eq!(b.peek(&r), big(x * 7 % 13), "{x}/2");
		b.check().unwrap();
	}
}

#[test]
fn test_mul_add_exhaustive_mod_13() {
	for form in [Form::Plain, Form::Montgomery] {
		let zm = ZMod::new(13u32, form);
		let b = builder();
		for x in 0..13u64 {
			for y in 0..13u64 {
				let xr = loaded(&b, &zm, x);
				let yr = loaded(&b, &zm, y);
				let acc = loaded(&b, &zm, x);
				zm.mul_add(&b, &xr, &yr, &acc);
				assert_eq!(zm.decode(&b.measure(&acc)), big((x * y + x) % 13), "{form:?}");
				b.measure(&xr);
				b.measure(&yr);
				b.release(acc);
				b.release(yr);
				b.release(xr);
			}
		}
		b.check().unwrap();
	}
}

#[test]
fn test_square_add_mod_13() {
	for form in [Form::Plain, Form::Montgomery] {
		let zm = ZMod::new(13u32, form);
		for x in 0..13u64 {
			let b = builder();
			let xr = loaded(&b, &zm, x);
			let acc = loaded(&b, &zm, 1);
			zm.square_add(&b, &xr, &acc);
			assert_eq!(zm.decode(&b.peek(&acc)), big((x * x + 1) % 13), "{form:?}");
			zm.square_sub(&b, &xr, &acc);
			assert_eq!(zm.decode(&b.peek(&acc)), big(1));
			b.check().unwrap();
		}
	}
}

#[test]
fn test_invert_exhaustive_mod_13() {
	let m = big(13);
	for form in [Form::Plain, Form::Montgomery] {
		let zm = ZMod::new(13u32, form);
		for x in 0..13u64 {
			let b = builder();
			let xr = loaded(&b, &zm, x);
			let out = zm.allocate(&b);
			zm.invert(&b, &xr, &out);
			let expected = reference::mod_inverse(&big(x), &m);
			assert_eq!(zm.decode(&b.peek(&out)), expected, "{form:?}: 1/{x}");
			assert_eq!(zm.decode(&b.peek(&xr)), big(x));
			b.check().unwrap();
		}
	}
}

#[test]
fn test_invert_zero_both_directions() {
	let zm = ZMod::new(863u32, Form::Montgomery);
	let b = builder();
	let x = zm.allocate(&b);
	let out = zm.allocate(&b);
	zm.invert(&b, &x, &out);
	assert_eq!(b.peek(&out), BigUint::ZERO);
	b.adjoint(|b| zm.invert(b, &x, &out));
	assert_eq!(b.peek(&out), BigUint::ZERO);
	b.check().unwrap();
}

#[test]
fn test_div() {
	let zm = ZMod::new(863u32, Form::Montgomery);
	let b = builder();
	let x = loaded(&b, &zm, 472);
	let y = loaded(&b, &zm, 767);
	let out = loaded(&b, &zm, 5);
	zm.div(&b, &x, &y, &out);
	let p = big(863);
	let expected = (big(767) * reference::mod_inverse(&big(472), &p) + 5u32) % &p;
	assert_eq!(zm.decode(&b.peek(&out)), expected);
	b.check().unwrap();
}

#[test]
fn test_register_modulus() {
	let m = big(11);
	for form in [Form::Plain, Form::Montgomery] {
		let b = builder();
		let mreg = load(&b, 4, m.clone());
		let zm = ZMod::with_register(mreg.clone(), form);
		let encode = |v: u64| match form {
			Form::Plain => big(v),
			Form::Montgomery => reference::to_montgomery(&big(v), 4, &m),
		};
		let x = load(&b, 4, encode(7));
		let y = load(&b, 4, encode(9));
		let acc = load(&b, 4, encode(3));
		zm.add(&b, &x, &y);
		assert_eq!(b.peek(&y), encode(5));
		zm.mul_add(&b, &x, &y, &acc);
		assert_eq!(b.peek(&acc), encode(38 % 11));
		let inv = zm.allocate(&b);
		zm.invert(&b, &x, &inv);
		assert_eq!(b.peek(&inv), encode(8));
		assert_eq!(b.peek(&mreg), m);
		b.check().unwrap();
	}
}

#[test]
fn test_mul_windows_agree() {
	let zm = ZMod::new(863u32, Form::Montgomery);
	let expected = reference::montgomery_mul(&big(600), &big(701), 10, &big(863));
	for window in 1..=4 {
		let b = builder();
		let x = load(&b, 10, 600u32);
		let y = load(&b, 10, 701u32);
		let out = zm.allocate(&b);
		let scratch = b.allocate(mul_scratch_size(10, window));
		let pending = zm.mul_open(&b, &x, &y, &out, &scratch, window);
		assert_eq!(b.peek(&out), expected, "window {window}");
		pending.close();
		assert_eq!(b.peek(&out), BigUint::ZERO);
		assert_eq!(b.peek(&scratch), BigUint::ZERO);
		b.check().unwrap();
	}
}

fn invert_midpoint(x: u64) -> (BigUint, BigUint) {
	let zm = ZMod::new(863u32, Form::Montgomery);
	let b = builder();
	let xr = loaded(&b, &zm, x);
	let out = zm.allocate(&b);
	let scratch = b.allocate(invert_scratch_size(10));
	let pending = zm.invert_open(&b, &xr, &out, &scratch);
	let midpoint = (b.peek(&out), b.peek(&scratch));
	pending.close();
	assert_eq!(b.peek(&out), BigUint::ZERO);
	assert_eq!(b.peek(&scratch), BigUint::ZERO);
	b.check().unwrap();
	midpoint
}

#[test]
fn test_open_scratch_is_deterministic() {
	let (out_a, scratch_a) = invert_midpoint(123);
	let (out_b, scratch_b) = invert_midpoint(123);
	assert_eq!(out_a, out_b);
	assert_eq!(scratch_a, scratch_b);
	assert_ne!(scratch_a, BigUint::ZERO);
}

#[test]
fn test_predicated_invert() {
	let zm = ZMod::new(863u32, Form::Montgomery);
	for ctl in [0u32, 1] {
		let b = builder();
		let k = load(&b, 1, ctl);
		let x = loaded(&b, &zm, 123);
		let out = zm.allocate(&b);
		let width_before = b.stat().width;
		b.with_control(k[0], |b| zm.invert(b, &x, &out));
		assert_eq!(b.stat().width, width_before);
		let expected = if ctl == 1 {
			reference::mod_inverse(&big(123), &big(863))
		} else {
			big(0)
		};
		assert_eq!(zm.decode(&b.peek(&out)), expected);
		assert_eq!(zm.decode(&b.peek(&x)), big(123));
		b.check().unwrap();
	}
}

#[test]
fn test_predicated_invert_open() {
	let zm = ZMod::new(863u32, Form::Montgomery);
	let unpredicated = invert_midpoint(123);
	for ctl in [0u32, 1] {
		let b = builder();
		let k = load(&b, 1, ctl);
		let x = loaded(&b, &zm, 123);
		let out = zm.allocate(&b);
		let scratch = b.allocate(invert_scratch_size(10));
		let pending = b.with_control(k[0], |b| zm.invert_open(b, &x, &out, &scratch));
		let midpoint = (b.peek(&out), b.peek(&scratch));
		if ctl == 1 {
			assert_eq!(midpoint, unpredicated);
		} else {
			assert_eq!(midpoint, (BigUint::ZERO, BigUint::ZERO));
		}
		pending.close();
		assert_eq!(b.peek(&out), BigUint::ZERO);
		assert_eq!(b.peek(&scratch), BigUint::ZERO);
		b.check().unwrap();
	}
}

#[test]
fn test_predicated_mul_add() {
	for ctl in [0u32, 1] {
		let zm = ZMod::new(863u32, Form::Montgomery);
		let b = builder();
		let k = load(&b, 1, ctl);
		let x = loaded(&b, &zm, 321);
		let y = loaded(&b, &zm, 654);
		let acc = loaded(&b, &zm, 17);
		let width_before = b.stat().width;
		b.with_control(k[0], |b| zm.mul_add(b, &x, &y, &acc));
		let expected = if ctl == 1 { (321 * 654 + 17) % 863 } else { 17 };
		assert_eq!(zm.decode(&b.peek(&acc)), big(expected));
		assert_eq!(b.stat().width, width_before);
		b.check().unwrap();
	}
}

#[test]
fn test_random_256bit() {
	// 2²⁵⁵ - 19.
	let p: BigUint = (BigUint::from(1u32) << 255) - 19u32;
	let zm = ZMod::new(p.clone(), Form::Montgomery);
	let mut rng = StdRng::seed_from_u64(1);
	let b = CircuitBuilder::with_options(Options::default());
	for _ in 0..100 {
		let x = random_below(&mut rng, &p);
		let y = random_below(&mut rng, &p);
		let xr = zm.allocate(&b);
		let yr = zm.allocate(&b);
		let acc = zm.allocate(&b);
		zm.load(&b, &xr, &x);
		zm.load(&b, &yr, &y);
		zm.mul_add(&b, &xr, &yr, &acc);
		zm.add(&b, &xr, &yr);
		zm.double(&b, &xr);
		assert_eq!(zm.decode(&b.measure(&acc)), &x * &y % &p);
		assert_eq!(zm.decode(&b.measure(&yr)), (&x + &y) % &p);
		assert_eq!(zm.decode(&b.measure(&xr)), (&x << 1) % &p);
		b.release(acc);
		b.release(yr);
		b.release(xr);
	}
	b.check().unwrap();
}

#[test]
fn test_invert_random_64bit() {
	let p = BigUint::from(0xffff_ffff_ffff_ffc5u64);
	let zm = ZMod::new(p.clone(), Form::Montgomery);
	let mut rng = StdRng::seed_from_u64(2);
	for _ in 0..10 {
		let x = random_below(&mut rng, &p);
		let b = builder();
		let xr = zm.allocate(&b);
		zm.load(&b, &xr, &x);
		let out = zm.allocate(&b);
		zm.invert(&b, &xr, &out);
		assert_eq!(zm.decode(&b.peek(&out)), reference::mod_inverse(&x, &p));
		b.check().unwrap();
	}
}

proptest! {
	#[test]
	fn prop_add_inverse_law(x in 0u64..863, y in 0u64..863) {
		let zm = ZMod::new(863u32, Form::Montgomery);
		let b = builder();
		let xr = loaded(&b, &zm, x);
		let yr = loaded(&b, &zm, y);
		zm.add(&b, &xr, &yr);
		b.adjoint(|b| zm.add(b, &xr, &yr));
		prop_assert_eq!(zm.decode(&b.peek(&yr)), big(y));
		prop_assert!(b.check().is_ok());
	}

	#[test]
	fn prop_montgomery_mul_matches_reference(x in 0u64..863, y in 0u64..863) {
		let zm = ZMod::new(863u32, Form::Montgomery);
		let b = builder();
		let xr = load(&b, 10, x);
		let yr = load(&b, 10, y);
		let acc = zm.allocate(&b);
		zm.mul_add(&b, &xr, &yr, &acc);
		prop_assert_eq!(b.peek(&acc), reference::montgomery_mul(&big(x), &big(y), 10, &big(863)));
	}
}
