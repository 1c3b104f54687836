// Copyright 2025 Irreducible Inc.
use std::collections::BTreeSet;

use cranelift_entity::EntityRef;
use revarith_core::{Qubit, Register};

/// Hands out qubit indices.
///
/// Released indices are reused lowest-first so that a replayed block tends to get back the very
/// indices it was recorded with, which lets tape compaction cancel it against its forward copy.
#[derive(Default)]
pub(crate) struct Arena {
	next: usize,
	free: BTreeSet<Qubit>,
}

impl Arena {
	pub(crate) fn take(&mut self, n: usize) -> Register {
		let mut qubits = Vec::with_capacity(n);
		while qubits.len() < n {
			match self.free.pop_first() {
				Some(q) => qubits.push(q),
				None => break,
			}
		}
		while qubits.len() < n {
			qubits.push(Qubit::new(self.next));
			self.next += 1;
		}
		Register::new(qubits)
	}

	/// Takes exactly the qubits of `wanted` if all of them are free, otherwise any `n` qubits.
	pub(crate) fn take_preferring(&mut self, wanted: &Register) -> Register {
		if wanted.iter().all(|q| self.free.contains(&q)) {
			for q in wanted {
				self.free.remove(&q);
			}
			return wanted.clone();
		}
		self.take(wanted.len())
	}

	pub(crate) fn give_back(&mut self, reg: &Register) {
		for q in reg {
			let fresh = self.free.insert(q);
			assert!(fresh, "qubit {q} released twice");
		}
	}
}
