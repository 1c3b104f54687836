// Copyright 2025 Irreducible Inc.
use revarith_frontend::{CircuitBuilder, Pending, Register};

use super::{Fp2, Fp2Elem};
use crate::{Carve, modular, reference as classical};

impl Fp2 {
	/// Scratch bits needed by [`mul_open`](Self::mul_open).
	pub fn mul_scratch_size(&self, window: usize) -> usize {
		let n = self.width();
		2 * n + 4 * modular::mul_scratch_size(n, window)
	}

	/// Scratch bits needed by [`square_open`](Self::square_open).
	pub fn square_scratch_size(&self, window: usize) -> usize {
		let n = self.width();
		3 * n + 2 * modular::mul_scratch_size(n, window)
	}

	/// Scratch bits needed by [`invert_open`](Self::invert_open).
	pub fn invert_scratch_size(&self, window: usize) -> usize {
		let n = self.width();
		3 * n
			+ 2 * modular::square_scratch_size(n, window)
			+ modular::invert_scratch_size(n)
			+ 2 * modular::mul_scratch_size(n, window)
	}

	/// `acc = acc + x·y`.
	///
	/// Four modular multiply-and-adds; `-bd` is added by negating the real accumulator around
	/// the `+bd` call.
	pub fn mul_add(&self, b: &CircuitBuilder, x: &Fp2Elem, y: &Fp2Elem, acc: &Fp2Elem) {
		let zm = &self.zm;
		zm.mul_add(b, &x.re, &y.re, &acc.re);
		zm.neg(b, &acc.re);
		zm.mul_add(b, &x.im, &y.im, &acc.re);
		zm.neg(b, &acc.re);
		zm.mul_add(b, &x.re, &y.im, &acc.im);
		zm.mul_add(b, &x.im, &y.re, &acc.im);
	}

	/// `acc = acc - x·y`.
	pub fn mul_sub(&self, b: &CircuitBuilder, x: &Fp2Elem, y: &Fp2Elem, acc: &Fp2Elem) {
		b.adjoint(|b| self.mul_add(b, x, y, acc));
	}

	/// `acc = acc + k·y` for a classical `k`.
	pub fn mul_const_add(
		&self,
		b: &CircuitBuilder,
		k: &classical::Fp2,
		y: &Fp2Elem,
		acc: &Fp2Elem,
	) {
		self.with_temp(b, |b, kreg| {
			self.load(b, kreg, k);
			self.mul_add(b, kreg, y, acc);
			self.load(b, kreg, k);
		});
	}

	/// `acc = acc + x²`, from `(a + b)(a - b)` and `2a·b`.
	pub fn square_add(&self, b: &CircuitBuilder, x: &Fp2Elem, acc: &Fp2Elem) {
		let zm = &self.zm;
		self.with_temp(b, |b, t| {
			b.copy(&x.re, &t.re);
			zm.add(b, &x.im, &t.re);
			b.copy(&x.re, &t.im);
			zm.sub(b, &x.im, &t.im);
			zm.mul_add(b, &t.re, &t.im, &acc.re);
			zm.add(b, &x.im, &t.im);
			b.copy(&x.re, &t.im);
			zm.sub(b, &x.im, &t.re);

			zm.double(b, &t.re);
			zm.mul_add(b, &t.re, &x.im, &acc.im);
			zm.halve(b, &t.re);
			b.copy(&x.re, &t.re);
		});
	}

	/// `acc = acc - x²`.
	pub fn square_sub(&self, b: &CircuitBuilder, x: &Fp2Elem, acc: &Fp2Elem) {
		b.adjoint(|b| self.square_add(b, x, acc));
	}

	/// Writes `x·y` into the zero element `out`, leaving `scratch` dirty.
	pub fn mul_open(
		&self,
		b: &CircuitBuilder,
		x: &Fp2Elem,
		y: &Fp2Elem,
		out: &Fp2Elem,
		scratch: &Register,
		window: usize,
	) -> Pending {
		let zm = &self.zm;
		let n = self.width();
		let ms = modular::mul_scratch_size(n, window);
		b.open(|b| {
			let mut carve = Carve::new(scratch);
			let bd = carve.take(n);
			let bc = carve.take(n);
			zm.mul_open(b, &x.re, &y.re, &out.re, &carve.take(ms), window).absorb();
			zm.mul_open(b, &x.im, &y.im, &bd, &carve.take(ms), window).absorb();
			zm.sub(b, &bd, &out.re);
			zm.mul_open(b, &x.re, &y.im, &out.im, &carve.take(ms), window).absorb();
			zm.mul_open(b, &x.im, &y.re, &bc, &carve.take(ms), window).absorb();
			zm.add(b, &bc, &out.im);
		})
	}

	/// Writes `x²` into the zero element `out`, leaving `scratch` dirty.
	pub fn square_open(
		&self,
		b: &CircuitBuilder,
		x: &Fp2Elem,
		out: &Fp2Elem,
		scratch: &Register,
		window: usize,
	) -> Pending {
		let zm = &self.zm;
		let n = self.width();
		let ms = modular::mul_scratch_size(n, window);
		b.open(|b| {
			let mut carve = Carve::new(scratch);
			let sum = carve.take(n);
			let diff = carve.take(n);
			let twice = carve.take(n);
			b.copy(&x.re, &sum);
			zm.add(b, &x.im, &sum);
			b.copy(&x.re, &diff);
			zm.sub(b, &x.im, &diff);
			b.copy(&x.re, &twice);
			zm.double(b, &twice);
			zm.mul_open(b, &sum, &diff, &out.re, &carve.take(ms), window).absorb();
			zm.mul_open(b, &twice, &x.im, &out.im, &carve.take(ms), window).absorb();
		})
	}

	/// Writes `x⁻¹ = (a - b·i) / (a² + b²)` into the zero element `out`, with `0⁻¹ = 0`.
	pub fn invert_open(
		&self,
		b: &CircuitBuilder,
		x: &Fp2Elem,
		out: &Fp2Elem,
		scratch: &Register,
		window: usize,
	) -> Pending {
		let zm = &self.zm;
		let n = self.width();
		let ss = modular::square_scratch_size(n, window);
		let ms = modular::mul_scratch_size(n, window);
		b.open(|b| {
			let mut carve = Carve::new(scratch);
			let norm = carve.take(n);
			let im_sq = carve.take(n);
			let norm_inv = carve.take(n);
			zm.square_open(b, &x.re, &norm, &carve.take(ss), window).absorb();
			zm.square_open(b, &x.im, &im_sq, &carve.take(ss), window).absorb();
			zm.add(b, &im_sq, &norm);
			zm.invert_open(b, &norm, &norm_inv, &carve.take(modular::invert_scratch_size(n)))
				.absorb();
			zm.mul_open(b, &x.re, &norm_inv, &out.re, &carve.take(ms), window).absorb();
			zm.mul_open(b, &x.im, &norm_inv, &out.im, &carve.take(ms), window).absorb();
			zm.neg(b, &out.im);
		})
	}

	/// `out ^= x⁻¹`.
	pub fn invert(&self, b: &CircuitBuilder, x: &Fp2Elem, out: &Fp2Elem) {
		self.with_inverse(b, x, |b, inv| self.copy(b, inv, out));
	}

	/// `acc = acc + x⁻¹`.
	pub fn invert_add(&self, b: &CircuitBuilder, x: &Fp2Elem, acc: &Fp2Elem) {
		self.with_inverse(b, x, |b, inv| self.add(b, inv, acc));
	}

	/// `out = out + y / x`, with division by zero adding zero.
	pub fn div(&self, b: &CircuitBuilder, x: &Fp2Elem, y: &Fp2Elem, out: &Fp2Elem) {
		self.with_inverse(b, x, |b, inv| self.mul_add(b, inv, y, out));
	}

	/// Runs `f` with `x⁻¹` available in a temporary.
	fn with_inverse(
		&self,
		b: &CircuitBuilder,
		x: &Fp2Elem,
		f: impl FnOnce(&CircuitBuilder, &Fp2Elem),
	) {
		let window = b.options().mul_window;
		self.with_temp(b, |b, inv| {
			b.with_ancilla(self.invert_scratch_size(window), |b, scratch| {
				let pending = self.invert_open(b, x, inv, scratch, window);
				f(b, inv);
				pending.close();
			})
		});
	}
}
