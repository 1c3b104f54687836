// Copyright 2025 Irreducible Inc.
use super::{CircuitBuilder, tape::Op};

/// Deferred cleanup of an open operation.
///
/// Holds the recording of everything the operation did. [`close`](Self::close) undoes it,
/// returning the output and the scratch of the operation to zero. The inputs must hold the same
/// values they held when the operation ran.
///
/// Dropping the token without consuming it leaves the scratch dirty for good and is recorded as
/// a fault on the builder.
#[must_use = "an open operation leaves dirty scratch behind; call `close` or `absorb`"]
pub struct Pending {
	builder: CircuitBuilder,
	ops: Vec<Op>,
	consumed: bool,
}

impl Pending {
	pub(super) fn new(builder: CircuitBuilder, ops: Vec<Op>) -> Self {
		Self {
			builder,
			ops,
			consumed: false,
		}
	}

	/// Runs the inverse of the recorded operation.
	pub fn close(mut self) {
		self.consumed = true;
		let ops = std::mem::take(&mut self.ops);
		self.builder.replay_reversed(ops);
	}

	/// Leaves cleanup to the enclosing [`open`](CircuitBuilder::open) or
	/// [`adjoint`](CircuitBuilder::adjoint) scope, whose recording already covers this one.
	///
	/// # Panics
	/// Panics if there is no enclosing recording.
	pub fn absorb(mut self) {
		assert!(
			self.builder.is_recording(),
			"absorb: no enclosing recording would clean up after this operation"
		);
		self.consumed = true;
	}

	/// Number of recorded events left after compaction.
	pub fn len(&self) -> usize {
		self.ops.len()
	}

	/// Returns `true` if the operation turned out to be the identity.
	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}
}

impl Drop for Pending {
	fn drop(&mut self) {
		if !self.consumed && !std::thread::panicking() {
			self.builder.note_unconsumed();
		}
	}
}
