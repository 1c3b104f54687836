// Copyright 2025 Irreducible Inc.
//! Fixed-width unsigned integer arithmetic.
//!
//! Registers are read least-significant bit first. Additions work modulo `2ⁿ`, where `n` is the
//! width of the register being updated; the addend may be narrower and is then zero-extended.
//! Subtractions are the adjoints of the additions.

mod adder;
mod cmp;

#[cfg(test)]
mod tests;

pub use adder::{Adder, CuccaroAdder, LookaheadAdder, RippleCarryAdder, adder_for};
pub use cmp::{eq_const, greater_than, greater_than_const, less_than, less_than_const};
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Qubit, Register};

/// Runs `f` on `x` zero-extended to `width` bits.
pub(crate) fn with_zero_extended<R>(
	b: &CircuitBuilder,
	x: &Register,
	width: usize,
	f: impl FnOnce(&CircuitBuilder, &Register) -> R,
) -> R {
	assert!(x.len() <= width, "operand of {} bits is wider than {width}", x.len());
	if x.len() == width {
		return f(b, x);
	}
	b.with_ancilla(width - x.len(), |b, pad| f(b, &x.concat(pad)))
}

/// `y += x` using the builder's configured adder, carry-out XORed into `carry`.
pub fn add(b: &CircuitBuilder, x: &Register, y: &Register, carry: Option<Qubit>) {
	add_with(adder_for(b.options().adder), b, x, y, carry);
}

/// `y += x` using `adder`.
pub fn add_with(
	adder: &dyn Adder,
	b: &CircuitBuilder,
	x: &Register,
	y: &Register,
	carry: Option<Qubit>,
) {
	debug_assert!(x.is_disjoint(y), "add: x and y must not share qubits");
	with_zero_extended(b, x, y.len(), |b, x| adder.add(b, x, y, carry));
}

/// `y -= x`, borrow XORed into `borrow`.
pub fn sub(b: &CircuitBuilder, x: &Register, y: &Register, borrow: Option<Qubit>) {
	b.adjoint(|b| add(b, x, y, borrow));
}

/// `y += k`, carry-out XORed into `carry`. `k` is reduced modulo `2ⁿ`.
pub fn add_const(b: &CircuitBuilder, k: &BigUint, y: &Register, carry: Option<Qubit>) {
	let k = truncate(k, y.len());
	b.with_ancilla(y.len(), |b, t| {
		b.xor_const(t, &k);
		add(b, t, y, carry);
		b.xor_const(t, &k);
	});
}

/// `y -= k`, borrow XORed into `borrow`.
pub fn sub_const(b: &CircuitBuilder, k: &BigUint, y: &Register, borrow: Option<Qubit>) {
	b.adjoint(|b| add_const(b, k, y, borrow));
}

/// `x = -x mod 2ⁿ`.
pub fn negate(b: &CircuitBuilder, x: &Register) {
	b.not(x);
	add_const(b, &BigUint::from(1u32), x, None);
}

/// Multiplies `reg` by two modulo `2ⁿ` by rotating its bits up. The top bit wraps into bit 0,
/// so the caller makes sure it is clear.
pub fn rotate_up(b: &CircuitBuilder, reg: &Register) {
	for i in (1..reg.len()).rev() {
		b.swap(reg[i], reg[i - 1]);
	}
}

/// Inverse of [`rotate_up`]: halves `reg` when bit 0 is clear.
pub fn rotate_down(b: &CircuitBuilder, reg: &Register) {
	for i in 1..reg.len() {
		b.swap(reg[i], reg[i - 1]);
	}
}

pub(crate) fn truncate(k: &BigUint, width: usize) -> BigUint {
	if k.bits() as usize <= width {
		k.clone()
	} else {
		k % (BigUint::from(1u32) << width)
	}
}
