// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Register};

use super::{AffinePoint, affine_add};
use crate::{integer, modular::ZMod, reference as classical};

/// `point = point + table[addr]`, in place.
///
/// `table` has `2^w` entries for a `w`-bit address on the curve with linear coefficient `a`.
/// The selected entry is looked up into a scratch point, added under control of its `finite`
/// flag so that identity entries are skipped, and then unloaded again. Every finite entry must
/// satisfy the preconditions of [`affine_add`] against `point`.
///
/// # Panics
/// Panics if the table size does not match the address width.
pub fn table_add(
	b: &CircuitBuilder,
	zm: &ZMod,
	a: &Register,
	table: &[classical::AffinePoint],
	addr: &Register,
	point: &AffinePoint,
) {
	assert_eq!(table.len(), 1 << addr.len(), "table must have one entry per address");
	let b = b.subcircuit("table_add");
	let _span = tracing::debug_span!("table_add", window = addr.len()).entered();
	let entry = AffinePoint::allocate(&b, zm);
	lookup(&b, zm, addr, |a| &table[a], &entry);
	b.with_control(entry.finite, |b| affine_add(b, zm, a, &entry, point));
	lookup(&b, zm, addr, |a| &table[a], &entry);
	entry.release(&b);
}

/// `point = point + (addr - 2^(w-1))·B`, in place, for a `w`-bit address.
///
/// `multiples[k] = k·B` for `0 ≤ k ≤ 2^(w-1)`, so the table is half the size of the one
/// [`table_add`] would need. Negative offsets look up `|k|·B` and negate its y-coordinate while
/// it is added.
///
/// # Panics
/// Panics if the table size does not match the address width.
pub fn signed_table_add(
	b: &CircuitBuilder,
	zm: &ZMod,
	a: &Register,
	multiples: &[classical::AffinePoint],
	addr: &Register,
	point: &AffinePoint,
) {
	let w = addr.len();
	assert!(w >= 1, "address must have at least one bit");
	let half = 1usize << (w - 1);
	assert_eq!(multiples.len(), half + 1, "table must hold the multiples 0..=2^(w-1)");
	let b = b.subcircuit("signed_table_add");
	let _span = tracing::debug_span!("signed_table_add", window = w).entered();
	let select = |a: usize| &multiples[a.abs_diff(half)];

	let entry = AffinePoint::allocate(&b, zm);
	lookup(&b, zm, addr, select, &entry);
	// The top address bit is clear exactly for the negative offsets.
	let negative = addr.msb();
	b.with_control_value(negative, false, |b| zm.neg(b, &entry.y));
	b.with_control(entry.finite, |b| affine_add(b, zm, a, &entry, point));
	b.with_control_value(negative, false, |b| zm.neg(b, &entry.y));
	lookup(&b, zm, addr, select, &entry);
	entry.release(&b);
}

/// `entry ^= select(addr)`, one equality test per address.
fn lookup<'t>(
	b: &CircuitBuilder,
	zm: &ZMod,
	addr: &Register,
	select: impl Fn(usize) -> &'t classical::AffinePoint,
	entry: &AffinePoint,
) {
	for a in 0..1usize << addr.len() {
		let pt = select(a);
		if !pt.finite {
			continue;
		}
		b.with_ancilla(1, |b, hit| {
			let key = BigUint::from(a);
			integer::eq_const(b, addr, &key, hit[0]);
			b.with_control(hit[0], |b| entry.load(b, zm, pt));
			integer::eq_const(b, addr, &key, hit[0]);
		});
	}
}
