// Copyright 2025 Irreducible Inc.
//! The quadratic extension `F_p[i] / (i² + 1)` over Montgomery-form [`ZMod`].
//!
//! An element `a + b·i` is a pair of registers sharing one modulus. Linear operations act on
//! both halves; products are built from modular multiply-and-add calls.

mod mul;

#[cfg(test)]
mod tests;

use itertools::izip;
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Qubit, Register};

use crate::{
	modular::{Form, Modulus, ZMod},
	reference as classical,
};

/// Element `re + im·i` held in two registers.
#[derive(Debug, Clone)]
pub struct Fp2Elem {
	/// Real part.
	pub re: Register,
	/// Imaginary part.
	pub im: Register,
}

/// Arithmetic in the quadratic extension.
#[derive(Debug, Clone)]
pub struct Fp2 {
	zm: ZMod,
}

impl Fp2 {
	/// The extension of `F_p` for the constant prime `p ≡ 3 mod 4`, in Montgomery form.
	///
	/// # Panics
	/// Panics unless `p ≡ 3 mod 4`, the condition for `i² = -1` to have no root in `F_p`.
	pub fn new(p: impl Into<BigUint>) -> Self {
		let p = p.into();
		assert_eq!(&p % 4u32, BigUint::from(3u32), "modulus {p} must be 3 mod 4");
		Self::over(ZMod::new(p, Form::Montgomery))
	}

	/// The extension over an arbitrary base ring, which the caller guarantees has no square root
	/// of `-1`.
	pub fn over(zm: ZMod) -> Self {
		Self { zm }
	}

	/// The base ring.
	pub fn base(&self) -> &ZMod {
		&self.zm
	}

	/// The classical field computing the same values.
	///
	/// # Panics
	/// Panics for a register modulus.
	pub fn classical(&self) -> classical::ExtField {
		match self.zm.modulus() {
			Modulus::Const(p) => classical::ExtField::new(p.clone()),
			Modulus::Register(_) => panic!("classical values need a constant modulus"),
		}
	}

	/// Width of each half.
	pub fn width(&self) -> usize {
		self.zm.width()
	}

	/// Allocates a zero element.
	pub fn allocate(&self, b: &CircuitBuilder) -> Fp2Elem {
		Fp2Elem {
			re: self.zm.allocate(b),
			im: self.zm.allocate(b),
		}
	}

	/// Releases an element, which must be zero.
	pub fn release(&self, b: &CircuitBuilder, e: Fp2Elem) {
		b.release(e.im);
		b.release(e.re);
	}

	/// Runs `f` with a zero scratch element.
	pub fn with_temp<R>(&self, b: &CircuitBuilder, f: impl FnOnce(&CircuitBuilder, &Fp2Elem) -> R) -> R {
		let t = self.allocate(b);
		let out = f(b, &t);
		self.release(b, t);
		out
	}

	/// Stored forms of the two halves of `v`.
	pub fn encode(&self, v: &classical::Fp2) -> (BigUint, BigUint) {
		(self.zm.encode(&v.re), self.zm.encode(&v.im))
	}

	/// `e ^= encode(v)`.
	pub fn load(&self, b: &CircuitBuilder, e: &Fp2Elem, v: &classical::Fp2) {
		self.zm.load(b, &e.re, &v.re);
		self.zm.load(b, &e.im, &v.im);
	}

	/// Reads and decodes `e` without disturbing it.
	pub fn peek(&self, b: &CircuitBuilder, e: &Fp2Elem) -> classical::Fp2 {
		classical::Fp2 {
			re: self.zm.decode(&b.peek(&e.re)),
			im: self.zm.decode(&b.peek(&e.im)),
		}
	}

	/// Logs both halves of `e` at debug level.
	pub fn debug_elem(&self, b: &CircuitBuilder, label: &str, e: &Fp2Elem) {
		b.debug_register(&format!("{label}.re"), &e.re);
		b.debug_register(&format!("{label}.im"), &e.im);
	}

	/// `dst ^= src`.
	pub fn copy(&self, b: &CircuitBuilder, src: &Fp2Elem, dst: &Fp2Elem) {
		b.copy(&src.re, &dst.re);
		b.copy(&src.im, &dst.im);
	}

	/// Exchanges `x` and `y` if `control` is set.
	pub fn cswap(&self, b: &CircuitBuilder, control: Qubit, x: &Fp2Elem, y: &Fp2Elem) {
		for (xs, ys) in [(&x.re, &y.re), (&x.im, &y.im)] {
			for (p, q) in izip!(xs, ys) {
				b.cswap(control, p, q);
			}
		}
	}

	/// `y = y + x`.
	pub fn add(&self, b: &CircuitBuilder, x: &Fp2Elem, y: &Fp2Elem) {
		self.zm.add(b, &x.re, &y.re);
		self.zm.add(b, &x.im, &y.im);
	}

	/// `y = y - x`.
	pub fn sub(&self, b: &CircuitBuilder, x: &Fp2Elem, y: &Fp2Elem) {
		self.zm.sub(b, &x.re, &y.re);
		self.zm.sub(b, &x.im, &y.im);
	}

	/// `y = y + k` for a classical `k`.
	pub fn add_const(&self, b: &CircuitBuilder, k: &classical::Fp2, y: &Fp2Elem) {
		let (re, im) = self.encode(k);
		self.zm.add_const(b, &re, &y.re);
		self.zm.add_const(b, &im, &y.im);
	}

	/// `x = -x`.
	pub fn neg(&self, b: &CircuitBuilder, x: &Fp2Elem) {
		self.zm.neg(b, &x.re);
		self.zm.neg(b, &x.im);
	}

	/// `x = 2x`.
	pub fn double(&self, b: &CircuitBuilder, x: &Fp2Elem) {
		self.zm.double(b, &x.re);
		self.zm.double(b, &x.im);
	}

	/// `x = x / 2`.
	pub fn halve(&self, b: &CircuitBuilder, x: &Fp2Elem) {
		self.zm.halve(b, &x.re);
		self.zm.halve(b, &x.im);
	}
}
