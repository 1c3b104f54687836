// Copyright 2025 Irreducible Inc.
use revarith_frontend::CircuitBuilder;

use super::{MontCurve, XzPoint};
use crate::{field::Fp2, reference as classical};

/// `out += x([2]p)` on the curve `(A24+ : C24)`.
///
/// With `s₋ = (X - Z)²`, `s₊ = (X + Z)²`, `e = s₊ - s₋` and `c₀ = C24·s₋`, the double is
/// `(c₀·s₊ : (c₀ + A24·e)·e)`. `out` is normally zero on entry; `p` and `curve` are unchanged.
pub fn xdbl(b: &CircuitBuilder, f: &Fp2, p: &XzPoint, curve: &MontCurve, out: &XzPoint) {
	let b = b.subcircuit("xdbl");
	let _span = tracing::debug_span!("xdbl").entered();
	let ((c0, sq_plus, w, e), pending) = b.open_with(|b| {
		let plus = f.allocate(b);
		f.copy(b, &p.x, &plus);
		f.add(b, &p.z, &plus);
		let minus = f.allocate(b);
		f.copy(b, &p.x, &minus);
		f.sub(b, &p.z, &minus);

		let sq_plus = f.allocate(b);
		f.square_add(b, &plus, &sq_plus);
		let sq_minus = f.allocate(b);
		f.square_add(b, &minus, &sq_minus);
		let e = f.allocate(b);
		f.copy(b, &sq_plus, &e);
		f.sub(b, &sq_minus, &e);

		let c0 = f.allocate(b);
		f.mul_add(b, &curve.c, &sq_minus, &c0);
		let w = f.allocate(b);
		f.copy(b, &c0, &w);
		f.mul_add(b, &curve.a, &e, &w);
		(c0, sq_plus, w, e)
	});
	f.mul_add(&b, &c0, &sq_plus, &out.x);
	f.mul_add(&b, &w, &e, &out.z);
	pending.close();
}

/// `out += x(q + p)` from the classical `p`, `q` and the difference `q - p`.
///
/// With `u = (X_q - Z_q)(X_p + Z_p)` and `v = (X_q + Z_q)(X_p - Z_p)` the sum is
/// `(Z_{q-p}·(u + v)² : X_{q-p}·(u - v)²)`. The result is meaningless if any input is the
/// identity.
///
/// # Panics
/// Panics if `f` has a register modulus.
pub fn xadd(
	b: &CircuitBuilder,
	f: &Fp2,
	p: &classical::XzPoint,
	q: &XzPoint,
	q_minus_p: &XzPoint,
	out: &XzPoint,
) {
	let b = b.subcircuit("xadd");
	let _span = tracing::debug_span!("xadd").entered();
	let ext = f.classical();
	let p_plus = ext.add(&p.x, &p.z);
	let p_minus = ext.sub(&p.x, &p.z);
	let ((sum_sq, diff_sq), pending) = b.open_with(|b| {
		let q_minus = f.allocate(b);
		f.copy(b, &q.x, &q_minus);
		f.sub(b, &q.z, &q_minus);
		let q_plus = f.allocate(b);
		f.copy(b, &q.x, &q_plus);
		f.add(b, &q.z, &q_plus);

		let u = f.allocate(b);
		f.mul_const_add(b, &p_plus, &q_minus, &u);
		let v = f.allocate(b);
		f.mul_const_add(b, &p_minus, &q_plus, &v);

		let sum = f.allocate(b);
		f.copy(b, &u, &sum);
		f.add(b, &v, &sum);
		let diff = f.allocate(b);
		f.copy(b, &u, &diff);
		f.sub(b, &v, &diff);

		let sum_sq = f.allocate(b);
		f.square_add(b, &sum, &sum_sq);
		let diff_sq = f.allocate(b);
		f.square_add(b, &diff, &diff_sq);
		(sum_sq, diff_sq)
	});
	f.mul_add(&b, &q_minus_p.z, &sum_sq, &out.x);
	f.mul_add(&b, &q_minus_p.x, &diff_sq, &out.z);
	pending.close();
}

/// `(A : C) → (A + 2C : 4C)` in place.
pub fn ac_to_a24(b: &CircuitBuilder, f: &Fp2, curve: &MontCurve) {
	f.double(b, &curve.c);
	f.add(b, &curve.c, &curve.a);
	f.double(b, &curve.c);
}

/// `(A24+ : C24) → (A : C)` in place, the exact inverse of [`ac_to_a24`].
pub fn a24_to_ac(b: &CircuitBuilder, f: &Fp2, curve: &MontCurve) {
	b.adjoint(|b| ac_to_a24(b, f, curve));
}
