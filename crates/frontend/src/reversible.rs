// Copyright 2025 Irreducible Inc.

//! The [`Reversible`] abstraction shared by every kernel.

use revarith_core::Qubit;

use crate::CircuitBuilder;

/// An operation with an exact inverse and a predicated form.
///
/// Only [`apply`](Self::apply) is required. The inverse replays the recorded gates backwards and
/// the predicated forms push the control onto the builder's control stack, so neither has to be
/// written per kernel.
///
/// Any `Fn(&CircuitBuilder)` closure implements this trait, which is how the kernel library's
/// free functions are usually lifted into it:
///
/// ```
/// # use revarith_frontend::{CircuitBuilder, Reversible};
/// let b = CircuitBuilder::new();
/// let reg = b.allocate(2);
/// let flip_low = |b: &CircuitBuilder| b.x(reg[0]);
/// flip_low.apply(&b);
/// flip_low.adjoint(&b);
/// assert_eq!(b.peek(&reg), 0u32.into());
/// # b.release(reg);
/// ```
pub trait Reversible {
	/// Runs the operation.
	fn apply(&self, b: &CircuitBuilder);

	/// Runs the exact inverse.
	fn adjoint(&self, b: &CircuitBuilder) {
		b.adjoint(|b| self.apply(b));
	}

	/// Runs the operation only if `control` is set.
	fn controlled(&self, b: &CircuitBuilder, control: Qubit) {
		b.with_control(control, |b| self.apply(b));
	}

	/// Runs the inverse only if `control` is set.
	fn controlled_adjoint(&self, b: &CircuitBuilder, control: Qubit) {
		b.with_control(control, |b| self.adjoint(b));
	}
}

impl<F: Fn(&CircuitBuilder)> Reversible for F {
	fn apply(&self, b: &CircuitBuilder) {
		self(b)
	}
}
