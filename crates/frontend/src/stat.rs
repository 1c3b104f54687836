// Copyright 2025 Irreducible Inc.

//! Gate and width statistics for estimating the cost of a kernel.

use std::{fmt, iter};

use cranelift_entity::SecondaryMap;
use revarith_core::{Gate, GateKind, Qubit};

/// Counters accumulated over every gate applied to the backend.
///
/// Gates that only exist on a dry tape (the recording half of an adjoint) are not counted; their
/// replay is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateStat {
	/// Number of uncontrolled NOT gates.
	pub n_x: u64,
	/// Number of CNOT gates.
	pub n_cnot: u64,
	/// Number of Toffoli gates.
	///
	/// The dominant cost once the circuit is lowered to a fault-tolerant gate set.
	pub n_toffoli: u64,
	/// Number of NOT gates with three or more controls.
	///
	/// A k-control gate lowers to `2k - 3` Toffolis with borrowed ancillas.
	pub n_multi_controlled: u64,
	/// Sum of `controls - 2` over the multi-controlled gates.
	pub extra_controls: u64,
	/// Number of qubits allocated right now.
	pub width: usize,
	/// Largest value `width` has reached.
	pub peak_width: usize,
	/// Longest chain of gates acting on a common qubit.
	pub depth: u64,
	/// Like `depth`, counting each gate by its Toffoli equivalent and X or CNOT gates as free.
	pub toffoli_depth: u64,
	/// Number of qubits read out by measurement.
	pub n_measured: u64,
}

impl GateStat {
	/// Total number of gates of any kind.
	pub fn n_gates(&self) -> u64 {
		self.n_x + self.n_cnot + self.n_toffoli + self.n_multi_controlled
	}

	/// Number of Toffolis after lowering every multi-controlled gate.
	pub fn toffoli_equivalent(&self) -> u64 {
		self.n_toffoli + 2 * self.extra_controls + self.n_multi_controlled
	}

	/// Counters accumulated since the `earlier` snapshot was taken.
	///
	/// The width fields are copied from `self`. The depths are the growth of the critical path,
	/// which bounds the depth of the gates applied in between only from below.
	pub fn since(&self, earlier: &GateStat) -> GateStat {
		GateStat {
			n_x: self.n_x - earlier.n_x,
			n_cnot: self.n_cnot - earlier.n_cnot,
			n_toffoli: self.n_toffoli - earlier.n_toffoli,
			n_multi_controlled: self.n_multi_controlled - earlier.n_multi_controlled,
			extra_controls: self.extra_controls - earlier.extra_controls,
			width: self.width,
			peak_width: self.peak_width,
			depth: self.depth - earlier.depth,
			toffoli_depth: self.toffoli_depth - earlier.toffoli_depth,
			n_measured: self.n_measured - earlier.n_measured,
		}
	}

	pub(crate) fn count(&mut self, gate: &Gate, layers: &mut Layers) {
		let (full, toffoli) = layers.place(gate);
		self.depth = self.depth.max(full);
		self.toffoli_depth = self.toffoli_depth.max(toffoli);
		match gate.kind() {
			GateKind::X => self.n_x += 1,
			GateKind::Cnot => self.n_cnot += 1,
			GateKind::Toffoli => self.n_toffoli += 1,
			GateKind::MultiControlled => {
				self.n_multi_controlled += 1;
				self.extra_controls += (gate.controls.len() - 2) as u64;
			}
		}
	}

	pub(crate) fn grow(&mut self, n: usize) {
		self.width += n;
		self.peak_width = self.peak_width.max(self.width);
	}

	pub(crate) fn shrink(&mut self, n: usize) {
		self.width -= n;
	}

	pub(crate) fn measured(&mut self, n: usize) {
		self.n_measured += n as u64;
	}
}

/// Per-qubit layer of the last gate touching it.
#[derive(Default)]
pub(crate) struct Layers {
	full: SecondaryMap<Qubit, u64>,
	toffoli: SecondaryMap<Qubit, u64>,
}

impl Layers {
	/// Schedules `gate` after every gate sharing a qubit with it and returns its full and
	/// Toffoli layers.
	fn place(&mut self, gate: &Gate) -> (u64, u64) {
		let qubits = || gate.controls.iter().copied().chain(iter::once(gate.target));
		let full = qubits().map(|q| self.full[q]).max().unwrap_or(0) + 1;
		let toffoli = qubits().map(|q| self.toffoli[q]).max().unwrap_or(0) + toffoli_cost(gate);
		for q in qubits() {
			self.full[q] = full;
			self.toffoli[q] = toffoli;
		}
		(full, toffoli)
	}
}

/// Toffolis in the lowering of `gate`.
fn toffoli_cost(gate: &Gate) -> u64 {
	match gate.kind() {
		GateKind::X | GateKind::Cnot => 0,
		GateKind::Toffoli => 1,
		GateKind::MultiControlled => 2 * gate.controls.len() as u64 - 3,
	}
}

impl fmt::Display for GateStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fn fmt_num(n: u64) -> String {
			let s = n.to_string();
			let mut result = String::new();
			for (i, c) in s.chars().rev().enumerate() {
				if i > 0 && i % 3 == 0 {
					result.push(',');
				}
				result.push(c);
			}
			result.chars().rev().collect()
		}

		writeln!(f, "Gates")?;
		writeln!(f, "├─ Total: {}", fmt_num(self.n_gates()))?;
		writeln!(f, "│  ├─ X: {}", fmt_num(self.n_x))?;
		writeln!(f, "│  ├─ CNOT: {}", fmt_num(self.n_cnot))?;
		writeln!(f, "│  ├─ Toffoli: {}", fmt_num(self.n_toffoli))?;
		writeln!(f, "│  └─ Multi-controlled: {}", fmt_num(self.n_multi_controlled))?;
		writeln!(f, "├─ Toffoli equivalent: {}", fmt_num(self.toffoli_equivalent()))?;
		writeln!(f, "└─ Measured qubits: {}", fmt_num(self.n_measured))?;
		writeln!(f)?;
		writeln!(f, "Depth")?;
		writeln!(f, "├─ Full: {}", fmt_num(self.depth))?;
		writeln!(f, "└─ Toffoli: {}", fmt_num(self.toffoli_depth))?;
		writeln!(f)?;
		writeln!(f, "Width")?;
		writeln!(f, "├─ Live: {}", fmt_num(self.width as u64))?;
		writeln!(f, "└─ Peak: {}", fmt_num(self.peak_width as u64))?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use cranelift_entity::EntityRef;
	use revarith_core::Qubit;

	use super::*;

	#[test]
	fn test_count_and_display() {
		let q = |i| Qubit::new(i);
		let mut stat = GateStat::default();
		let mut layers = Layers::default();
		stat.grow(5);
		stat.shrink(2);
		stat.count(&Gate::x(q(0)), &mut layers);
		stat.count(&Gate::ccnot(q(0), q(1), q(2)), &mut layers);
		stat.count(&Gate::mcx(&[q(0), q(1), q(2), q(3)], q(4)), &mut layers);
		stat.measured(2);
		assert_eq!(stat.n_gates(), 3);
		assert_eq!(stat.toffoli_equivalent(), 1 + 2 * 2 + 1);
		assert_eq!(stat.peak_width, 5);
		assert_eq!(stat.width, 3);
		assert_eq!(stat.depth, 3);
		assert_eq!(stat.toffoli_depth, 1 + 5);

		let s = stat.to_string();
		assert!(s.contains("Toffoli: 1\n"));
		assert!(s.contains("Peak: 5"));
		assert!(s.contains("Measured qubits: 2"));
		assert!(s.contains("Full: 3"));
	}

	#[test]
	fn test_depth_of_parallel_gates() {
		let q = |i| Qubit::new(i);
		let mut stat = GateStat::default();
		let mut layers = Layers::default();
		stat.count(&Gate::ccnot(q(0), q(1), q(2)), &mut layers);
		stat.count(&Gate::cnot(q(3), q(4)), &mut layers);
		stat.count(&Gate::x(q(5)), &mut layers);
		assert_eq!((stat.depth, stat.toffoli_depth), (1, 1));

		let before = stat.clone();
		stat.count(&Gate::ccnot(q(2), q(4), q(6)), &mut layers);
		assert_eq!((stat.depth, stat.toffoli_depth), (2, 2));
		// A CNOT after a Toffoli adds to the full depth only.
		stat.count(&Gate::cnot(q(6), q(0)), &mut layers);
		assert_eq!((stat.depth, stat.toffoli_depth), (3, 2));

		let delta = stat.since(&before);
		assert_eq!((delta.depth, delta.toffoli_depth), (2, 1));
		assert_eq!(delta.n_gates(), 2);
	}
}
