// Copyright 2025 Irreducible Inc.
//! Arithmetic modulo an odd `M`, which is either a classical constant or held in a register.
//!
//! [`ZMod`] fixes the modulus, the register width `n` and the representation of values. In
//! [`Form::Montgomery`] a value `x` is stored as `x·2ⁿ mod M`, multiplication removes one factor
//! of `2ⁿ`, and so products of encoded values stay encoded exactly once.
//!
//! Every operation expects its operands to be reduced, i.e. smaller than `M`. Out-of-range
//! inputs are a caller error and produce unspecified results.
//!
//! Operations come in two disciplines. Closed ones (`add`, `mul_add`, `invert`, ...) return
//! all scratch to zero. Open ones (`mul_open`, `square_open`, `invert_open`) write their result
//! into a zero output, leave a caller-provided scratch block dirty and return the [`Pending`]
//! token that undoes both.
//!
//! [`Pending`]: revarith_frontend::Pending

mod addsub;
mod inv;
mod mul;

#[cfg(test)]
mod tests;

pub use inv::invert_scratch_size;
pub use mul::{mul_scratch_size, square_scratch_size};
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Register};

use crate::{integer, reference};

/// The modulus of a [`ZMod`].
#[derive(Debug, Clone)]
pub enum Modulus {
	/// A classical constant.
	Const(BigUint),
	/// A register holding the modulus. It is only ever read.
	Register(Register),
}

impl Modulus {
	/// `y += M` modulo `2^|y|`.
	pub(crate) fn add_to(&self, b: &CircuitBuilder, y: &Register) {
		match self {
			Modulus::Const(m) => integer::add_const(b, m, y, None),
			Modulus::Register(m) => integer::add(b, m, y, None),
		}
	}

	/// `y -= M` modulo `2^|y|`.
	pub(crate) fn sub_from(&self, b: &CircuitBuilder, y: &Register) {
		b.adjoint(|b| self.add_to(b, y));
	}

	/// `reg ^= M`.
	pub(crate) fn xor_into(&self, b: &CircuitBuilder, reg: &Register) {
		match self {
			Modulus::Const(m) => b.xor_const(reg, m),
			Modulus::Register(m) => b.copy(m, reg),
		}
	}
}

/// Representation of values in a register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Form {
	/// `x` is stored as `x`.
	Plain,
	/// `x` is stored as `x·2ⁿ mod M`.
	Montgomery,
}

/// The ring `Z/M` on `n`-bit registers.
#[derive(Debug, Clone)]
pub struct ZMod {
	modulus: Modulus,
	n: usize,
	form: Form,
}

impl ZMod {
	/// Arithmetic modulo the constant `m`, on registers as wide as `m`.
	///
	/// # Panics
	/// Panics if `m` is even or smaller than 3.
	pub fn new(m: impl Into<BigUint>, form: Form) -> Self {
		let m = m.into();
		assert!(m.bit(0) && m > BigUint::from(1u32), "modulus {m} must be odd and at least 3");
		let n = m.bits() as usize;
		Self {
			modulus: Modulus::Const(m),
			n,
			form,
		}
	}

	/// Arithmetic modulo the value held in `m`, which must be odd.
	pub fn with_register(m: Register, form: Form) -> Self {
		let n = m.len();
		Self {
			modulus: Modulus::Register(m),
			n,
			form,
		}
	}

	/// Register width.
	pub fn width(&self) -> usize {
		self.n
	}

	/// Representation of values.
	pub fn form(&self) -> Form {
		self.form
	}

	/// The modulus.
	pub fn modulus(&self) -> &Modulus {
		&self.modulus
	}

	fn constant(&self) -> &BigUint {
		match &self.modulus {
			Modulus::Const(m) => m,
			Modulus::Register(_) => panic!("classical values need a constant modulus"),
		}
	}

	/// Stored form of the value `v`.
	///
	/// # Panics
	/// Panics for a register modulus.
	pub fn encode(&self, v: &BigUint) -> BigUint {
		let m = self.constant();
		match self.form {
			Form::Plain => v % m,
			Form::Montgomery => reference::to_montgomery(v, self.n, m),
		}
	}

	/// Value represented by the stored form `v`.
	///
	/// # Panics
	/// Panics for a register modulus.
	pub fn decode(&self, v: &BigUint) -> BigUint {
		let m = self.constant();
		match self.form {
			Form::Plain => v % m,
			Form::Montgomery => reference::from_montgomery(v, self.n, m),
		}
	}

	/// `reg ^= encode(v)`.
	pub fn load(&self, b: &CircuitBuilder, reg: &Register, v: &BigUint) {
		self.check(reg);
		b.xor_const(reg, &self.encode(v));
	}

	/// Allocates a zero register of the ring's width.
	pub fn allocate(&self, b: &CircuitBuilder) -> Register {
		b.allocate(self.n)
	}

	fn check(&self, reg: &Register) {
		assert_eq!(reg.len(), self.n, "operand width does not match the modulus width {}", self.n);
	}
}
