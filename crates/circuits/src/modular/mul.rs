// Copyright 2025 Irreducible Inc.
use revarith_frontend::{CircuitBuilder, Pending, Register};

use super::{Form, ZMod};
use crate::integer;

/// Scratch bits needed by [`ZMod::mul_open`] for `n`-bit operands.
///
/// The Montgomery form uses `n` quotient bits, `window + 1` accumulator extension bits and one
/// flag. The plain form only uses the first `n` bits.
pub fn mul_scratch_size(n: usize, window: usize) -> usize {
	n + window + 2
}

/// Scratch bits needed by [`ZMod::square_open`]: a copy of the operand on top of a product.
pub fn square_scratch_size(n: usize, window: usize) -> usize {
	n + mul_scratch_size(n, window)
}

impl ZMod {
	/// Writes `x·y mod M` (plain) or `x·y·2⁻ⁿ mod M` (Montgomery) into the zero register `out`.
	///
	/// `scratch` must be zero and at least [`mul_scratch_size`] bits wide. In Montgomery form
	/// `window` multiplier bits are accumulated before each run of reductions; larger windows
	/// widen the accumulator. Closing the returned token clears `out` and `scratch`.
	///
	/// # Panics
	/// Panics if `window` is zero or `scratch` is too small.
	pub fn mul_open(
		&self,
		b: &CircuitBuilder,
		x: &Register,
		y: &Register,
		out: &Register,
		scratch: &Register,
		window: usize,
	) -> Pending {
		self.check(x);
		self.check(y);
		self.check(out);
		assert!(window > 0, "mul_open: window must be positive");
		assert!(
			scratch.len() >= mul_scratch_size(self.n, window),
			"mul_open: scratch of {} bits is smaller than {}",
			scratch.len(),
			mul_scratch_size(self.n, window)
		);
		let b = b.subcircuit("mul");
		b.open(|b| match self.form {
			Form::Plain => self.mul_plain(b, x, y, out, &scratch.slice(..self.n)),
			Form::Montgomery => self.mul_montgomery(b, x, y, out, scratch, window),
		})
	}

	/// Shift-and-add: `out += Σ xᵢ·2ⁱ·y`, leaving `2ⁿ⁻¹·y` in `t`.
	fn mul_plain(&self, b: &CircuitBuilder, x: &Register, y: &Register, out: &Register, t: &Register) {
		b.copy(y, t);
		for i in 0..self.n {
			b.with_control(x[i], |b| self.add(b, t, out));
			if i + 1 < self.n {
				self.double(b, t);
			}
		}
	}

	/// Bit-serial Montgomery multiplication.
	///
	/// The accumulator is `out` extended by `window + 1` bits. For every window of multiplier
	/// bits the shifted multiples of `y` are added in, then each reduction round records the
	/// accumulator parity in a quotient bit, adds `M` if it was odd and halves.
	fn mul_montgomery(
		&self,
		b: &CircuitBuilder,
		x: &Register,
		y: &Register,
		out: &Register,
		scratch: &Register,
		window: usize,
	) {
		let n = self.n;
		let quotient = scratch.slice(..n);
		let acc = out.concat(&scratch.slice(n..n + window + 1));
		let flag = scratch[n + window + 1];

		let mut i = 0;
		while i < n {
			let w = window.min(n - i);
			for j in 0..w {
				b.with_control(x[i + j], |b| integer::add(b, y, &acc.slice(j..), None));
			}
			for j in 0..w {
				let q = quotient[i + j];
				b.cnot(acc[0], q);
				b.with_control(q, |b| self.modulus.add_to(b, &acc));
				integer::rotate_down(b, &acc);
			}
			i += w;
		}

		// acc < 2M here.
		self.modulus.sub_from(b, &acc);
		b.cnot(acc.msb(), flag);
		b.with_control(flag, |b| self.modulus.add_to(b, &acc));
	}

	/// Writes `x²` (with one factor `2⁻ⁿ` in Montgomery form) into the zero register `out`.
	///
	/// `scratch` must be zero and at least [`square_scratch_size`] bits wide.
	pub fn square_open(
		&self,
		b: &CircuitBuilder,
		x: &Register,
		out: &Register,
		scratch: &Register,
		window: usize,
	) -> Pending {
		self.check(x);
		assert!(
			scratch.len() >= square_scratch_size(self.n, window),
			"square_open: scratch of {} bits is smaller than {}",
			scratch.len(),
			square_scratch_size(self.n, window)
		);
		b.open(|b| {
			let (copy, rest) = scratch.split_at(self.n);
			b.copy(x, &copy);
			self.mul_open(b, x, &copy, out, &rest, window).absorb();
		})
	}

	/// `acc = acc + x·y mod M` (with one factor `2⁻ⁿ` in Montgomery form).
	pub fn mul_add(&self, b: &CircuitBuilder, x: &Register, y: &Register, acc: &Register) {
		let window = b.options().mul_window;
		b.with_ancilla(self.n, |b, prod| {
			b.with_ancilla(mul_scratch_size(self.n, window), |b, scratch| {
				let pending = self.mul_open(b, x, y, prod, scratch, window);
				self.add(b, prod, acc);
				pending.close();
			})
		});
	}

	/// `acc = acc - x·y mod M`.
	pub fn mul_sub(&self, b: &CircuitBuilder, x: &Register, y: &Register, acc: &Register) {
		b.adjoint(|b| self.mul_add(b, x, y, acc));
	}

	/// `acc = acc + x² mod M`.
	pub fn square_add(&self, b: &CircuitBuilder, x: &Register, acc: &Register) {
		let window = b.options().mul_window;
		b.with_ancilla(self.n, |b, prod| {
			b.with_ancilla(square_scratch_size(self.n, window), |b, scratch| {
				let pending = self.square_open(b, x, prod, scratch, window);
				self.add(b, prod, acc);
				pending.close();
			})
		});
	}

	/// `acc = acc - x² mod M`.
	pub fn square_sub(&self, b: &CircuitBuilder, x: &Register, acc: &Register) {
		b.adjoint(|b| self.square_add(b, x, acc));
	}
}
