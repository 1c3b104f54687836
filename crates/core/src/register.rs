// Copyright 2025 Irreducible Inc.
//! [`Register`] related definitions.

use std::ops::{Bound, Index, RangeBounds};

use crate::qubit::Qubit;

/// A fixed-width unsigned integer stored bit by bit.
///
/// The qubits are ordered least-significant first: `reg[0]` is the weight-1 bit. A register is
/// only a handle; cloning it does not copy any state, so two clones name the same qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Register {
	qubits: Vec<Qubit>,
}

impl Register {
	/// Wraps the given qubits, least-significant first.
	pub fn new(qubits: Vec<Qubit>) -> Self {
		Self { qubits }
	}

	/// Width in bits.
	pub fn len(&self) -> usize {
		self.qubits.len()
	}

	/// Returns `true` for a zero-width register.
	pub fn is_empty(&self) -> bool {
		self.qubits.is_empty()
	}

	/// All qubits, least-significant first.
	pub fn qubits(&self) -> &[Qubit] {
		&self.qubits
	}

	/// Iterates the qubits, least-significant first.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = Qubit> + ExactSizeIterator + '_ {
		self.qubits.iter().copied()
	}

	/// The most significant qubit.
	///
	/// # Panics
	/// Panics if the register is empty.
	pub fn msb(&self) -> Qubit {
		*self
			.qubits
			.last()
			.expect("msb: register must not be empty")
	}

	/// A sub-register covering the given bit range.
	pub fn slice(&self, range: impl RangeBounds<usize>) -> Register {
		let start = match range.start_bound() {
			Bound::Included(&s) => s,
			Bound::Excluded(&s) => s + 1,
			Bound::Unbounded => 0,
		};
		let end = match range.end_bound() {
			Bound::Included(&e) => e + 1,
			Bound::Excluded(&e) => e,
			Bound::Unbounded => self.qubits.len(),
		};
		Register::new(self.qubits[start..end].to_vec())
	}

	/// Splits into the low `mid` bits and the remaining high bits.
	pub fn split_at(&self, mid: usize) -> (Register, Register) {
		let (lo, hi) = self.qubits.split_at(mid);
		(Register::new(lo.to_vec()), Register::new(hi.to_vec()))
	}

	/// Concatenates `high` on top of `self`.
	pub fn concat(&self, high: &Register) -> Register {
		let mut qubits = self.qubits.clone();
		qubits.extend_from_slice(&high.qubits);
		Register::new(qubits)
	}

	/// Appends one qubit as the new most significant bit.
	pub fn with_msb(&self, q: Qubit) -> Register {
		let mut qubits = self.qubits.clone();
		qubits.push(q);
		Register::new(qubits)
	}

	/// Returns `true` if `q` belongs to this register.
	pub fn contains(&self, q: Qubit) -> bool {
		self.qubits.contains(&q)
	}

	/// Returns `true` if the two registers share no qubit.
	pub fn is_disjoint(&self, other: &Register) -> bool {
		self.qubits.iter().all(|q| !other.contains(*q))
	}
}

impl Index<usize> for Register {
	type Output = Qubit;

	fn index(&self, index: usize) -> &Qubit {
		&self.qubits[index]
	}
}

impl FromIterator<Qubit> for Register {
	fn from_iter<T: IntoIterator<Item = Qubit>>(iter: T) -> Self {
		Register::new(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Register {
	type Item = Qubit;
	type IntoIter = std::iter::Copied<std::slice::Iter<'a, Qubit>>;

	fn into_iter(self) -> Self::IntoIter {
		self.qubits.iter().copied()
	}
}

#[cfg(test)]
mod tests {
	use cranelift_entity::EntityRef;

	use super::*;

	fn reg(ids: &[usize]) -> Register {
		ids.iter().map(|&i| Qubit::new(i)).collect()
	}

	#[test]
	fn test_slice_and_split() {
		let r = reg(&[3, 4, 5, 6]);
		assert_eq!(r.slice(1..3), reg(&[4, 5]));
		assert_eq!(r.slice(2..), reg(&[5, 6]));
		let (lo, hi) = r.split_at(1);
		assert_eq!(lo, reg(&[3]));
		assert_eq!(hi, reg(&[4, 5, 6]));
		assert_eq!(lo.concat(&hi), r);
		assert_eq!(r.msb(), Qubit::new(6));
	}

	#[test]
	fn test_disjoint() {
		let a = reg(&[0, 1]);
		let b = reg(&[2, 3]);
		assert!(a.is_disjoint(&b));
		assert!(!a.is_disjoint(&a.with_msb(Qubit::new(2))));
	}
}
