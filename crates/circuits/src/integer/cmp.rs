// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Qubit, Register};

use super::{adder_for, with_zero_extended};

/// `t ^= [x < y]`. Operands are compared as unsigned integers of the wider width.
///
/// The result is the carry out of `¬x + y`.
pub fn less_than(b: &CircuitBuilder, x: &Register, y: &Register, t: Qubit) {
	let width = x.len().max(y.len());
	let adder = adder_for(b.options().adder);
	with_zero_extended(b, x, width, |b, x| {
		with_zero_extended(b, y, width, |b, y| {
			b.not(x);
			adder.carry(b, x, y, t);
			b.not(x);
		})
	});
}

/// `t ^= [x > y]`.
pub fn greater_than(b: &CircuitBuilder, x: &Register, y: &Register, t: Qubit) {
	less_than(b, y, x, t);
}

/// `t ^= [x < k]`.
pub fn less_than_const(b: &CircuitBuilder, x: &Register, k: &BigUint, t: Qubit) {
	if k.bits() as usize > x.len() {
		b.x(t);
		return;
	}
	b.with_ancilla(x.len(), |b, kreg| {
		b.xor_const(kreg, k);
		less_than(b, x, kreg, t);
		b.xor_const(kreg, k);
	});
}

/// `t ^= [x > k]`.
pub fn greater_than_const(b: &CircuitBuilder, x: &Register, k: &BigUint, t: Qubit) {
	if k.bits() as usize > x.len() {
		return;
	}
	b.with_ancilla(x.len(), |b, kreg| {
		b.xor_const(kreg, k);
		less_than(b, kreg, x, t);
		b.xor_const(kreg, k);
	});
}

/// `t ^= [x == k]`.
pub fn eq_const(b: &CircuitBuilder, x: &Register, k: &BigUint, t: Qubit) {
	if k.bits() as usize > x.len() {
		return;
	}
	let zeros: Vec<Qubit> = x
		.iter()
		.enumerate()
		.filter(|&(i, _)| !k.bit(i as u64))
		.map(|(_, q)| q)
		.collect();
	for &q in &zeros {
		b.x(q);
	}
	b.mcx(x.qubits(), t);
	for &q in &zeros {
		b.x(q);
	}
}
