// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use revarith_frontend::{AdderStrategy, CircuitBuilder};

use super::*;
use crate::testing::{ALL_ADDERS, builder_with, load, random_bits};

fn run_add(strategy: AdderStrategy, n: usize, x: u64, y: u64) -> (u64, u64, u64) {
	let b = builder_with(strategy);
	let xr = load(&b, n, x);
	let yr = load(&b, n, y);
	let c = b.allocate(1);
	add(&b, &xr, &yr, Some(c[0]));
	let out = (
		u64::try_from(b.measure(&xr)).unwrap(),
		u64::try_from(b.measure(&yr)).unwrap(),
		u64::try_from(b.measure(&c)).unwrap(),
	);
	b.release(c);
	b.release(yr);
	b.release(xr);
	b.check().unwrap();
	out
}

#[test]
fn test_add_5_plus_9() {
	for strategy in ALL_ADDERS {
		let b = builder_with(strategy);
		let x = load(&b, 4, 5u32);
		let y = load(&b, 4, 9u32);
		let c = b.allocate(1);
		add(&b, &x, &y, Some(c[0]));
		assert_eq!(b.peek(&y), BigUint::from(14u32), "{strategy:?}");
		assert_eq!(b.peek(&c), BigUint::ZERO, "{strategy:?}");

		b.adjoint(|b| add(b, &x, &y, Some(c[0])));
		assert_eq!(b.peek(&y), BigUint::from(9u32), "{strategy:?}");
		assert_eq!(b.peek(&x), BigUint::from(5u32), "{strategy:?}");
		assert_eq!(b.peek(&c), BigUint::ZERO, "{strategy:?}");
		b.check().unwrap();
	}
}

#[test]
fn test_add_exhaustive_4bit() {
	for strategy in ALL_ADDERS {
		for x in 0..16u64 {
			for y in 0..16u64 {
				let (rx, ry, rc) = run_add(strategy, 4, x, y);
				assert_eq!(rx, x);
				assert_eq!(ry, (x + y) % 16, "{strategy:?}: {x} + {y}");
				assert_eq!(rc, u64::from(x + y >= 16), "{strategy:?}: {x} + {y}");
			}
		}
	}
}

#[test]
fn test_sub_borrow_exhaustive_4bit() {
	for strategy in ALL_ADDERS {
		for x in 0..16u64 {
			for y in 0..16u64 {
				let b = builder_with(strategy);
				let xr = load(&b, 4, x);
				let yr = load(&b, 4, y);
				let c = b.allocate(1);
				sub(&b, &xr, &yr, Some(c[0]));
				assert_eq!(b.peek(&yr), BigUint::from((y + 16 - x) % 16));
				assert_eq!(b.peek(&c), BigUint::from(u64::from(y < x)));
				b.check().unwrap();
			}
		}
	}
}

#[test]
fn test_add_predicated() {
	for strategy in ALL_ADDERS {
		for ctl in [false, true] {
			let b = builder_with(strategy);
			let k = load(&b, 1, u32::from(ctl));
			let x = load(&b, 6, 45u32);
			let y = load(&b, 6, 30u32);
			let c = b.allocate(1);
			b.with_control(k[0], |b| add(b, &x, &y, Some(c[0])));
			let (sum, carry) = if ctl { (11u32, 1u32) } else { (30, 0) };
			assert_eq!(b.peek(&y), BigUint::from(sum), "{strategy:?}");
			assert_eq!(b.peek(&c), BigUint::from(carry), "{strategy:?}");
			assert_eq!(b.peek(&x), BigUint::from(45u32));
			b.check().unwrap();
		}
	}
}

#[test]
fn test_add_zero_extends_narrow_addend() {
	let b = builder_with(AdderStrategy::Cuccaro);
	let x = load(&b, 3, 7u32);
	let y = load(&b, 8, 250u32);
	let c = b.allocate(1);
	add(&b, &x, &y, Some(c[0]));
	assert_eq!(b.peek(&y), BigUint::from(1u32));
	assert_eq!(b.peek(&c), BigUint::from(1u32));
	b.check().unwrap();
}

#[test]
fn test_add_random_256bit() {
	let mut rng = StdRng::seed_from_u64(0);
	let modulus = BigUint::from(1u32) << 256;
	for strategy in ALL_ADDERS {
		for _ in 0..100 {
			let x = random_bits(&mut rng, 256);
			let y = random_bits(&mut rng, 256);
			let b = builder_with(strategy);
			let xr = load(&b, 256, x.clone());
			let yr = load(&b, 256, y.clone());
			let c = b.allocate(1);
			add(&b, &xr, &yr, Some(c[0]));
			let sum = &x + &y;
			assert_eq!(b.peek(&yr), &sum % &modulus);
			assert_eq!(b.peek(&c), BigUint::from(u32::from(sum >= modulus)));
			b.check().unwrap();
		}
	}
}

#[test]
fn test_add_const_and_negate() {
	let b = builder_with(AdderStrategy::Cuccaro);
	let y = load(&b, 5, 20u32);
	add_const(&b, &BigUint::from(15u32), &y, None);
	assert_eq!(b.peek(&y), BigUint::from(3u32));
	sub_const(&b, &BigUint::from(4u32), &y, None);
	assert_eq!(b.peek(&y), BigUint::from(31u32));
	negate(&b, &y);
	assert_eq!(b.peek(&y), BigUint::from(1u32));
	b.check().unwrap();
}

#[test]
fn test_rotations() {
	let b = builder_with(AdderStrategy::Cuccaro);
	let r = load(&b, 5, 0b01101u32);
	rotate_up(&b, &r);
	assert_eq!(b.peek(&r), BigUint::from(0b11010u32));
	rotate_up(&b, &r);
	assert_eq!(b.peek(&r), BigUint::from(0b10101u32));
	rotate_down(&b, &r);
	rotate_down(&b, &r);
	assert_eq!(b.peek(&r), BigUint::from(0b01101u32));
}

#[test]
fn test_comparators_exhaustive_4bit() {
	for strategy in ALL_ADDERS {
		let b = builder_with(strategy);
		for x in 0..16u32 {
			for y in 0..16u32 {
				let xr = load(&b, 4, x);
				let yr = load(&b, 4, y);
				let t = b.allocate(4);
				less_than(&b, &xr, &yr, t[0]);
				greater_than(&b, &xr, &yr, t[1]);
				less_than_const(&b, &xr, &BigUint::from(y), t[2]);
				greater_than_const(&b, &xr, &BigUint::from(y), t[3]);
				let expected = u32::from(x < y) | u32::from(x > y) << 1;
				let expected = expected | expected << 2;
				assert_eq!(b.measure(&t), BigUint::from(expected), "{strategy:?}: {x} vs {y}");
				assert_eq!(b.measure(&xr), BigUint::from(x));
				assert_eq!(b.measure(&yr), BigUint::from(y));
				b.release(t);
				b.release(yr);
				b.release(xr);
			}
		}
		b.check().unwrap();
	}
}

#[test]
fn test_comparator_constants_out_of_range() {
	let b = builder_with(AdderStrategy::Cuccaro);
	let x = load(&b, 3, 7u32);
	let t = b.allocate(3);
	less_than_const(&b, &x, &BigUint::from(8u32), t[0]);
	greater_than_const(&b, &x, &BigUint::from(8u32), t[1]);
	eq_const(&b, &x, &BigUint::from(7u32), t[2]);
	assert_eq!(b.peek(&t), BigUint::from(0b101u32));
}

fn comparator_is_self_inverse(b: &CircuitBuilder, x: u32, y: u32) -> bool {
	let xr = load(b, 5, x);
	let yr = load(b, 5, y);
	let t = b.allocate(1);
	less_than(b, &xr, &yr, t[0]);
	less_than(b, &xr, &yr, t[0]);
	b.peek(&t) == BigUint::ZERO
}

proptest! {
	#[test]
	fn prop_adders_agree(n in 1usize..12, x in any::<u64>(), y in any::<u64>()) {
		let mask = (1u64 << n) - 1;
		let (x, y) = (x & mask, y & mask);
		let expected = run_add(AdderStrategy::Cuccaro, n, x, y);
		prop_assert_eq!(run_add(AdderStrategy::RippleCarry, n, x, y), expected);
		prop_assert_eq!(run_add(AdderStrategy::Lookahead, n, x, y), expected);
	}

	#[test]
	fn prop_less_than_self_inverse(x in 0u32..32, y in 0u32..32) {
		let b = builder_with(AdderStrategy::Lookahead);
		prop_assert!(comparator_is_self_inverse(&b, x, y));
	}
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "must not share qubits")]
fn test_add_rejects_aliased_operands() {
	let b = builder_with(AdderStrategy::Cuccaro);
	let x = load(&b, 4, 3u32);
	add(&b, &x, &x, None);
}
