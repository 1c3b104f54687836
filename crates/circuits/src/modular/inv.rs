// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Pending, Qubit, Register};

use super::{Form, ZMod};
use crate::integer;

/// Scratch bits needed by [`ZMod::invert_open`]: the four `n`-bit GCD state registers and four
/// branch bits for each of the `2n` iterations.
pub fn invert_scratch_size(n: usize) -> usize {
	4 * n + 8 * n
}

/// One-hot branch decision of a binary GCD iteration.
struct Branch {
	/// `u` even.
	halve_u: Qubit,
	/// `u` odd, `v` even.
	halve_v: Qubit,
	/// Both odd, `u > v`.
	reduce_u: Qubit,
	/// Both odd, `u ≤ v`.
	reduce_v: Qubit,
}

impl ZMod {
	/// Writes `x⁻¹` into the zero register `out`, with `0⁻¹ = 0`.
	///
	/// In Montgomery form the input `x·2ⁿ` maps to `x⁻¹·2ⁿ`. `scratch` must be zero and at least
	/// [`invert_scratch_size`] bits wide. Closing the returned token clears `out` and `scratch`.
	///
	/// This is Kaliski's almost-inverse with a fixed count of `2n` iterations. It keeps
	/// `u·s + v·r ≡ 0` starting from `(u, v, r, s) = (M, x, 0, 1)`; once `v` reaches zero every
	/// further iteration doubles `r`, so the run ends with `r ≡ -x⁻¹·2²ⁿ`.
	///
	/// # Panics
	/// Panics if `scratch` is too small.
	pub fn invert_open(
		&self,
		b: &CircuitBuilder,
		x: &Register,
		out: &Register,
		scratch: &Register,
	) -> Pending {
		self.check(x);
		self.check(out);
		let n = self.n;
		assert!(
			scratch.len() >= invert_scratch_size(n),
			"invert_open: scratch of {} bits is smaller than {}",
			scratch.len(),
			invert_scratch_size(n)
		);
		let b = b.subcircuit("invert");
		b.open(|b| {
			let u = scratch.slice(..n);
			let v = scratch.slice(n..2 * n);
			let r = scratch.slice(2 * n..3 * n);
			let s = scratch.slice(3 * n..4 * n);
			self.modulus.xor_into(b, &u);
			b.copy(x, &v);
			b.xor_const(&s, &BigUint::from(1u32));

			for i in 0..2 * n {
				let base = 4 * n + 4 * i;
				let branch = Branch {
					halve_u: scratch[base],
					halve_v: scratch[base + 1],
					reduce_u: scratch[base + 2],
					reduce_v: scratch[base + 3],
				};
				self.gcd_step(b, &u, &v, &r, &s, &branch);
			}

			b.copy(&r, out);
			self.neg(b, out);
			if self.form == Form::Plain {
				for _ in 0..2 * n {
					self.halve(b, out);
				}
			}
		})
	}

	fn gcd_step(
		&self,
		b: &CircuitBuilder,
		u: &Register,
		v: &Register,
		r: &Register,
		s: &Register,
		branch: &Branch,
	) {
		let (u0, v0) = (u[0], v[0]);
		b.x(branch.halve_u);
		b.cnot(u0, branch.halve_u);

		b.with_control_value(v0, false, |b| b.cnot(u0, branch.halve_v));

		b.with_ancilla(1, |b, gt| {
			integer::greater_than(b, u, v, gt[0]);
			b.mcx(&[u0, v0, gt[0]], branch.reduce_u);
			integer::greater_than(b, u, v, gt[0]);
		});
		b.ccnot(u0, v0, branch.reduce_v);
		b.cnot(branch.reduce_u, branch.reduce_v);

		b.with_control(branch.halve_u, |b| {
			integer::rotate_down(b, u);
			self.double(b, s);
		});
		b.with_control(branch.halve_v, |b| {
			integer::rotate_down(b, v);
			self.double(b, r);
		});
		b.with_control(branch.reduce_u, |b| {
			integer::sub(b, v, u, None);
			integer::rotate_down(b, u);
			self.add(b, s, r);
			self.double(b, s);
		});
		b.with_control(branch.reduce_v, |b| {
			integer::sub(b, u, v, None);
			integer::rotate_down(b, v);
			self.add(b, r, s);
			self.double(b, r);
		});
	}

	/// `out ^= x⁻¹`, with `0⁻¹ = 0`.
	pub fn invert(&self, b: &CircuitBuilder, x: &Register, out: &Register) {
		b.with_ancilla(self.n, |b, inv| {
			b.with_ancilla(invert_scratch_size(self.n), |b, scratch| {
				let pending = self.invert_open(b, x, inv, scratch);
				b.copy(inv, out);
				pending.close();
			})
		});
	}

	/// `out = out + y·x⁻¹ mod M`.
	pub fn div(&self, b: &CircuitBuilder, x: &Register, y: &Register, out: &Register) {
		b.with_ancilla(self.n, |b, inv| {
			b.with_ancilla(invert_scratch_size(self.n), |b, scratch| {
				let pending = self.invert_open(b, x, inv, scratch);
				self.mul_add(b, inv, y, out);
				pending.close();
			})
		});
	}
}
