// Copyright 2025 Irreducible Inc.
//! The single gate family every kernel is built from.

use smallvec::{SmallVec, smallvec};

use crate::{consts::INLINE_CONTROLS, qubit::Qubit};

/// Control list of a [`Gate`].
pub type Controls = SmallVec<[Qubit; INLINE_CONTROLS]>;

/// A multi-controlled NOT: flips `target` iff every qubit in `controls` is set.
///
/// X, CNOT and Toffoli are the 0, 1 and 2 control cases. Every gate is its own inverse, which is
/// what lets the frontend derive adjoints by replaying a recorded gate list backwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gate {
	/// Qubits that must all be one for the flip to happen.
	pub controls: Controls,
	/// The flipped qubit.
	pub target: Qubit,
}

/// Coarse classification of a gate by its number of controls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateKind {
	/// No control.
	X,
	/// One control.
	Cnot,
	/// Two controls.
	Toffoli,
	/// Three or more controls.
	MultiControlled,
}

impl Gate {
	/// Unconditional NOT.
	pub fn x(target: Qubit) -> Self {
		Self {
			controls: SmallVec::new(),
			target,
		}
	}

	/// Controlled NOT.
	pub fn cnot(control: Qubit, target: Qubit) -> Self {
		Self::new(smallvec![control], target)
	}

	/// Toffoli.
	pub fn ccnot(c0: Qubit, c1: Qubit, target: Qubit) -> Self {
		Self::new(smallvec![c0, c1], target)
	}

	/// NOT controlled on every qubit of `controls`.
	pub fn mcx(controls: &[Qubit], target: Qubit) -> Self {
		Self::new(controls.iter().copied().collect(), target)
	}

	/// Creates a gate, dropping duplicate controls.
	///
	/// # Panics
	/// Panics if `target` is one of the controls.
	pub fn new(mut controls: Controls, target: Qubit) -> Self {
		assert!(!controls.contains(&target), "gate target {target} is also one of its controls");
		dedup_in_place(&mut controls);
		Self { controls, target }
	}

	/// Returns the same gate additionally conditioned on `extra`.
	///
	/// The extra controls go first so that gates decorated by the same stack compare equal.
	///
	/// # Panics
	/// Panics if `target` is one of `extra`.
	pub fn controlled_by(&self, extra: &[Qubit]) -> Self {
		if extra.is_empty() {
			return self.clone();
		}
		let mut controls: Controls = extra.iter().copied().collect();
		controls.extend(self.controls.iter().copied());
		Self::new(controls, self.target)
	}

	/// Rewrites every qubit reference through `f`.
	pub fn map_qubits(&self, f: impl Fn(Qubit) -> Qubit) -> Self {
		Self {
			controls: self.controls.iter().map(|&q| f(q)).collect(),
			target: f(self.target),
		}
	}

	/// Classifies this gate.
	pub fn kind(&self) -> GateKind {
		match self.controls.len() {
			0 => GateKind::X,
			1 => GateKind::Cnot,
			2 => GateKind::Toffoli,
			_ => GateKind::MultiControlled,
		}
	}
}

fn dedup_in_place(controls: &mut Controls) {
	let mut i = 0;
	while i < controls.len() {
		if controls[..i].contains(&controls[i]) {
			controls.remove(i);
		} else {
			i += 1;
		}
	}
}
