// Copyright 2025 Irreducible Inc.

//! Execution backends the builder drives gate by gate.

use cranelift_entity::EntityRef;
use revarith_core::{
	Gate, Qubit,
	consts::{LOG_STORAGE_WORD_BITS, STORAGE_WORD_BITS},
};

/// The state a builder applies gates to.
///
/// Allocation bookkeeping (which indices are free) belongs to the builder; a backend only sees
/// qubits come alive, change and retire.
pub trait Backend {
	/// Makes `qubit` live in the zero state.
	fn allocate(&mut self, qubit: Qubit);

	/// Retires `qubit` and returns the value it held.
	///
	/// The storage must read as zero afterwards, whatever the returned value.
	fn release(&mut self, qubit: Qubit) -> bool;

	/// Applies one gate.
	fn apply(&mut self, gate: &Gate);

	/// Reads the current value of `qubit` without disturbing it.
	fn read(&self, qubit: Qubit) -> bool;
}

/// Computational-basis simulator.
///
/// Every gate is a classical reversible permutation of basis states, so a single bit vector
/// holds the full state.
#[derive(Debug, Default, Clone)]
pub struct Simulator {
	words: Vec<u64>,
}

impl Simulator {
	/// Creates an empty simulator.
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	fn locate(qubit: Qubit) -> (usize, u64) {
		let index = qubit.index();
		(index >> LOG_STORAGE_WORD_BITS, 1u64 << (index % STORAGE_WORD_BITS))
	}

	#[inline]
	fn get(&self, qubit: Qubit) -> bool {
		let (word, mask) = Self::locate(qubit);
		self.words.get(word).is_some_and(|w| w & mask != 0)
	}

	#[inline]
	fn flip(&mut self, qubit: Qubit) {
		let (word, mask) = Self::locate(qubit);
		if word >= self.words.len() {
			self.words.resize(word + 1, 0);
		}
		self.words[word] ^= mask;
	}
}

impl Backend for Simulator {
	fn allocate(&mut self, qubit: Qubit) {
		let (word, _) = Self::locate(qubit);
		if word >= self.words.len() {
			self.words.resize(word + 1, 0);
		}
		debug_assert!(!self.get(qubit), "fresh qubit {qubit} is not zero");
	}

	fn release(&mut self, qubit: Qubit) -> bool {
		let value = self.get(qubit);
		if value {
			self.flip(qubit);
		}
		value
	}

	fn apply(&mut self, gate: &Gate) {
		if gate.controls.iter().all(|&c| self.get(c)) {
			self.flip(gate.target);
		}
	}

	fn read(&self, qubit: Qubit) -> bool {
		self.get(qubit)
	}
}

/// A backend that keeps no state at all.
///
/// Use it to collect [`GateStat`](crate::GateStat)s at widths the simulator cannot afford.
/// Every read returns zero and no release is ever dirty.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tally;

impl Backend for Tally {
	fn allocate(&mut self, _qubit: Qubit) {}

	fn release(&mut self, _qubit: Qubit) -> bool {
		false
	}

	fn apply(&mut self, _gate: &Gate) {}

	fn read(&self, _qubit: Qubit) -> bool {
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_simulator_toffoli_truth_table() {
		let (a, b, t) = (Qubit::new(0), Qubit::new(1), Qubit::new(130));
		for bits in 0..4u32 {
			let mut sim = Simulator::new();
			for q in [a, b, t] {
				sim.allocate(q);
			}
			if bits & 1 != 0 {
				sim.apply(&Gate::x(a));
			}
			if bits & 2 != 0 {
				sim.apply(&Gate::x(b));
			}
			sim.apply(&Gate::ccnot(a, b, t));
			assert_eq!(sim.read(t), bits == 3);
			assert_eq!(sim.release(t), bits == 3);
			assert!(!sim.read(t));
		}
	}
}
