// Copyright 2025 Irreducible Inc.
//! Reversible arithmetic kernels for cryptanalytic circuits.
//!
//! The kernels are layered, each built only on the layers before it:
//!
//! - [`integer`]: fixed-width adders, subtractors and comparators;
//! - [`modular`]: arithmetic modulo an odd constant or register, plain or in Montgomery form;
//! - [`field`]: the quadratic extension `F_p[i]/(i² + 1)`;
//! - [`curve`]: affine Weierstrass addition, x-only Montgomery arithmetic, ladders and windowed
//!   table lookups;
//! - [`isogeny`]: 2-isogenies, iterated doubling, j-invariants and the isogeny walk.
//!
//! [`reference`] holds classical functions computing the same values with the same formulas.
//!
//! Every kernel takes a [`CircuitBuilder`](revarith_frontend::CircuitBuilder) and emits gates
//! through it. Controlled and inverse forms come for free from
//! [`with_control`](revarith_frontend::CircuitBuilder::with_control) and
//! [`adjoint`](revarith_frontend::CircuitBuilder::adjoint).

#![warn(missing_docs)]

pub mod curve;
pub mod field;
pub mod integer;
pub mod isogeny;
pub mod modular;
pub mod reference;

#[cfg(test)]
mod testing;

use revarith_frontend::Register;

/// Splits a caller-provided scratch block into consecutive pieces.
pub(crate) struct Carve<'a> {
	block: &'a Register,
	pos: usize,
}

impl<'a> Carve<'a> {
	pub(crate) fn new(block: &'a Register) -> Self {
		Self { block, pos: 0 }
	}

	/// The next `n` bits.
	///
	/// # Panics
	/// Panics if the block is exhausted.
	pub(crate) fn take(&mut self, n: usize) -> Register {
		assert!(
			self.pos + n <= self.block.len(),
			"scratch block of {} bits is too small",
			self.block.len()
		);
		let piece = self.block.slice(self.pos..self.pos + n);
		self.pos += n;
		piece
	}
}
