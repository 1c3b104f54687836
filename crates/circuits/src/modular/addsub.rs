// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use num_traits::Zero;
use revarith_frontend::{CircuitBuilder, Register};

use super::ZMod;
use crate::integer;

impl ZMod {
	/// `y = x + y mod M`.
	pub fn add(&self, b: &CircuitBuilder, x: &Register, y: &Register) {
		self.check(x);
		self.check(y);
		b.with_ancilla(2, |b, t| {
			let (hi, f) = (t[0], t[1]);
			let wide = y.with_msb(hi);
			integer::add(b, x, &wide, None);
			self.modulus.sub_from(b, &wide);
			b.cnot(hi, f);
			b.with_control(f, |b| self.modulus.add_to(b, &wide));
			// `f` is set iff nothing was reduced, i.e. iff the result is not below `x`.
			integer::less_than(b, y, x, f);
			b.x(f);
		});
	}

	/// `y = y - x mod M`.
	pub fn sub(&self, b: &CircuitBuilder, x: &Register, y: &Register) {
		b.adjoint(|b| self.add(b, x, y));
	}

	/// `y = y + k mod M` for a classical `k` already in stored form.
	pub fn add_const(&self, b: &CircuitBuilder, k: &BigUint, y: &Register) {
		b.with_ancilla(self.n, |b, t| {
			b.xor_const(t, k);
			self.add(b, t, y);
			b.xor_const(t, k);
		});
	}

	/// `x = -x mod M`. Zero stays zero.
	pub fn neg(&self, b: &CircuitBuilder, x: &Register) {
		self.check(x);
		let zero = BigUint::zero();
		b.with_ancilla(1, |b, f| {
			let f = f[0];
			integer::eq_const(b, x, &zero, f);
			b.x(f);
			b.with_control(f, |b| {
				// 2ⁿ - 1 - x + 1 + M = M - x modulo 2ⁿ.
				b.not(x);
				integer::add_const(b, &BigUint::from(1u32), x, None);
				self.modulus.add_to(b, x);
			});
			integer::eq_const(b, x, &zero, f);
			b.x(f);
		});
	}

	/// `x = 2x mod M`.
	pub fn double(&self, b: &CircuitBuilder, x: &Register) {
		self.check(x);
		b.with_ancilla(2, |b, t| {
			let (hi, f) = (t[0], t[1]);
			let wide = x.with_msb(hi);
			integer::rotate_up(b, &wide);
			self.modulus.sub_from(b, &wide);
			b.cnot(hi, f);
			b.with_control(f, |b| self.modulus.add_to(b, &wide));
			// Unreduced results are even, reduced ones odd.
			b.cnot(x[0], f);
			b.x(f);
		});
	}

	/// `x = x / 2 mod M`.
	pub fn halve(&self, b: &CircuitBuilder, x: &Register) {
		b.adjoint(|b| self.double(b, x));
	}
}
