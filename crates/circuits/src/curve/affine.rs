// Copyright 2025 Irreducible Inc.
use num_bigint::BigUint;
use revarith_frontend::{CircuitBuilder, Register};

use super::AffinePoint;
use crate::{integer, modular::ZMod};

/// `q = p + q` on the short Weierstrass curve with linear coefficient `a`, in place. `p` and `a`
/// are unchanged.
///
/// The slope `λ = (y_q - y_p) / (x_q - x_p)` is computed into a fresh register, used, and then
/// uncomputed from the output coordinates, so no scratch survives the call. When `q = -2p` the
/// sum lands on `-p` and the output no longer determines the chord; the slope is then cleared as
/// the tangent slope at `p`, which is where `a` comes in.
///
/// `a` is held in the ring's stored form. Both points must be finite with `p ≠ ±q`; other inputs
/// are a caller error and leave garbage behind. The `finite` flags are not touched.
pub fn affine_add(b: &CircuitBuilder, zm: &ZMod, a: &Register, p: &AffinePoint, q: &AffinePoint) {
	let b = b.subcircuit("affine_add");
	let _span = tracing::debug_span!("affine_add", width = zm.width()).entered();

	// (dx, dy)
	zm.sub(&b, &p.x, &q.x);
	zm.sub(&b, &p.y, &q.y);

	let lambda = zm.allocate(&b);
	zm.div(&b, &q.x, &q.y, &lambda);
	// dy - λ·dx = 0
	zm.mul_sub(&b, &lambda, &q.x, &q.y);

	// x_q - x_p + 3 x_p - λ² = x_p - x_r
	for _ in 0..3 {
		zm.add(&b, &p.x, &q.x);
	}
	zm.square_sub(&b, &lambda, &q.x);

	// λ (x_p - x_r) = y_r + y_p
	zm.mul_add(&b, &lambda, &q.x, &q.y);
	b.with_ancilla(1, |b, tangent| {
		let zero = BigUint::from(0u32);
		integer::eq_const(b, &q.x, &zero, tangent[0]);
		// Adds nothing when x_r = x_p.
		b.adjoint(|b| zm.div(b, &q.x, &q.y, &lambda));
		let (slope, pending) = b.open_with(|b| tangent_slope(b, zm, a, p));
		b.with_control(tangent[0], |b| zm.sub(b, &slope, &lambda));
		pending.close();
		integer::eq_const(b, &q.x, &zero, tangent[0]);
	});
	b.release(lambda);

	zm.sub(&b, &p.y, &q.y);
	zm.neg(&b, &q.x);
	zm.add(&b, &p.x, &q.x);
}

/// `(3 x_p² + a) / (2 y_p)` in a fresh register.
fn tangent_slope(b: &CircuitBuilder, zm: &ZMod, a: &Register, p: &AffinePoint) -> Register {
	let sq = zm.allocate(b);
	zm.square_add(b, &p.x, &sq);
	let num = zm.allocate(b);
	for _ in 0..3 {
		zm.add(b, &sq, &num);
	}
	zm.add(b, a, &num);
	let den = zm.allocate(b);
	b.copy(&p.y, &den);
	zm.double(b, &den);
	let slope = zm.allocate(b);
	zm.div(b, &den, &num, &slope);
	slope
}
