// Copyright 2025 Irreducible Inc.
use std::collections::BTreeSet;

use revarith_core::{Gate, Register};

use super::scope::Scope;

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
	Gate(Gate),
	Alloc(Register),
	Release(Register),
}

impl Op {
	/// Returns `true` if `next` immediately following `self` is the identity.
	fn cancels(&self, next: &Op) -> bool {
		match (self, next) {
			(Op::Gate(a), Op::Gate(b)) => a == b,
			(Op::Alloc(a), Op::Release(b)) | (Op::Release(a), Op::Alloc(b)) => a == b,
			_ => false,
		}
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum TapeMode {
	/// Recorded only. Nothing reaches the backend or any tape further out.
	Dry,
	/// Applied as usual and recorded on the side.
	Trace,
}

pub(crate) struct Tape {
	pub(crate) mode: TapeMode,
	pub(crate) scope: Scope,
	pub(crate) ops: Vec<Op>,
}

impl Tape {
	pub(crate) fn new(mode: TapeMode, scope: Scope) -> Self {
		Self {
			mode,
			scope,
			ops: Vec::new(),
		}
	}

	/// Appends `op`, or drops it together with the last entry if the two cancel.
	pub(crate) fn push(&mut self, op: &Op) {
		if self.ops.last().is_some_and(|last| last.cancels(op)) {
			self.ops.pop();
		} else {
			self.ops.push(op.clone());
		}
	}

	/// Panics unless every qubit allocated on this tape is also released on it.
	pub(crate) fn assert_balanced(&self, what: &str) {
		let mut live = BTreeSet::new();
		for op in &self.ops {
			match op {
				Op::Alloc(reg) => live.extend(reg.iter()),
				Op::Release(reg) => {
					for q in reg {
						assert!(live.remove(&q), "{what}: releases {q}, allocated outside of it");
					}
				}
				Op::Gate(_) => {}
			}
		}
		assert!(live.is_empty(), "{what}: must release every register it allocates");
	}
}

#[cfg(test)]
mod tests {
	use cranelift_entity::EntityRef;
	use revarith_core::Qubit;

	use super::*;

	#[test]
	fn test_push_cancels_inverse_pairs() {
		let scope = Scope::new(0);
		let (a, b) = (Qubit::new(0), Qubit::new(1));
		let reg = Register::new(vec![b]);
		let mut tape = Tape::new(TapeMode::Trace, scope);
		tape.push(&Op::Alloc(reg.clone()));
		tape.push(&Op::Gate(Gate::cnot(a, b)));
		tape.push(&Op::Gate(Gate::cnot(a, b)));
		assert_eq!(tape.ops.len(), 1);
		tape.push(&Op::Release(reg));
		assert!(tape.ops.is_empty());
	}
}
