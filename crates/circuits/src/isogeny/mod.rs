// Copyright 2025 Irreducible Inc.
//! Isogeny kernels on Montgomery curves over the extension field.
//!
//! All points are x-only [`XzPoint`]s and curves are held as [`MontCurve`] coefficient pairs in
//! the `(A24+ : C24)` convention, except where a kernel says otherwise. The top-level
//! [`walk`] chains the ladder, iterated doubling and 2-isogenies into the j-invariant of the
//! codomain reached by a secret scalar.


use revarith_frontend::{CircuitBuilder, Pending, Register};

use crate::{
	curve::{Chain, Checkpointing, MontCurve, XzPoint, a24_to_ac, ladder3pt, run_chain, xdbl},
	field::{Fp2, Fp2Elem},
	reference as classical,
};

/// `out += φ(q)` for the 2-isogeny `φ` with kernel `⟨k⟩`.
///
/// `k` must have exact order two and `X_k ≠ 0`. With `t₀ = (X_k + Z_k)(X_q - Z_q)` and
/// `t₁ = (X_k - Z_k)(X_q + Z_q)` the image is `(X_q(t₀ + t₁) : Z_q(t₀ - t₁))`.
pub fn isog2_point(b: &CircuitBuilder, f: &Fp2, k: &XzPoint, q: &XzPoint, out: &XzPoint) {
	let b = b.subcircuit("isog2_point");
	let _span = tracing::debug_span!("isog2_point").entered();
	let ((sum, diff), pending) = b.open_with(|b| {
		let k_plus = f.allocate(b);
		f.copy(b, &k.x, &k_plus);
		f.add(b, &k.z, &k_plus);
		let k_minus = f.allocate(b);
		f.copy(b, &k.x, &k_minus);
		f.sub(b, &k.z, &k_minus);
		let q_plus = f.allocate(b);
		f.copy(b, &q.x, &q_plus);
		f.add(b, &q.z, &q_plus);
		let q_minus = f.allocate(b);
		f.copy(b, &q.x, &q_minus);
		f.sub(b, &q.z, &q_minus);

		let t0 = f.allocate(b);
		f.mul_add(b, &k_plus, &q_minus, &t0);
		let t1 = f.allocate(b);
		f.mul_add(b, &k_minus, &q_plus, &t1);
		let sum = f.allocate(b);
		f.copy(b, &t0, &sum);
		f.add(b, &t1, &sum);
		let diff = f.allocate(b);
		f.copy(b, &t0, &diff);
		f.sub(b, &t1, &diff);
		(sum, diff)
	});
	f.mul_add(&b, &q.x, &sum, &out.x);
	f.mul_add(&b, &q.z, &diff, &out.z);
	pending.close();
}

/// `out += (Z_k² - X_k² : Z_k²)`, the `(A24+ : C24)` of the codomain of the 2-isogeny with
/// kernel `⟨k⟩`.
pub fn isog2_curve(b: &CircuitBuilder, f: &Fp2, k: &XzPoint, out: &MontCurve) {
	let b = b.subcircuit("isog2_curve");
	let _span = tracing::debug_span!("isog2_curve").entered();
	f.square_add(&b, &k.z, &out.c);
	f.square_add(&b, &k.z, &out.a);
	f.square_sub(&b, &k.x, &out.a);
}

/// Repeated [`xdbl`] on a fixed curve.
struct Doubling<'a> {
	f: &'a Fp2,
	curve: &'a MontCurve,
}

impl Chain for Doubling<'_> {
	type State = XzPoint;

	fn allocate(&self, b: &CircuitBuilder) -> XzPoint {
		XzPoint::allocate(b, self.f)
	}

	fn release(&self, b: &CircuitBuilder, state: XzPoint) {
		state.release(b, self.f);
	}

	fn copy(&self, b: &CircuitBuilder, src: &XzPoint, dst: &XzPoint) {
		src.copy_to(b, self.f, dst);
	}

	fn step(&self, b: &CircuitBuilder, _i: usize, from: &XzPoint, to: &XzPoint) {
		xdbl(b, self.f, from, self.curve, to);
	}
}

/// `out ^= [2^e]p` on `curve`.
///
/// [`Checkpointing::KeepAll`] keeps all `e` intermediate points; [`Checkpointing::Recursive`]
/// keeps `O(log e)` of them at the price of extra doublings.
pub fn xdble(
	b: &CircuitBuilder,
	f: &Fp2,
	p: &XzPoint,
	curve: &MontCurve,
	e: usize,
	out: &XzPoint,
	strategy: Checkpointing,
) {
	let b = b.subcircuit("xdble");
	let _span = tracing::debug_span!("xdble", e, ?strategy).entered();
	run_chain(&b, &Doubling { f, curve }, p, e, out, strategy);
}

/// Writes `j = 256(A² - 3C²)³ / (C⁴(A² - 4C²))` of the `(A : C)` curve into the zero `out`.
///
/// A vanishing denominator yields zero. The intermediate values stay allocated until the
/// returned token is closed, which also clears `out`.
pub fn j_invariant_open(b: &CircuitBuilder, f: &Fp2, curve: &MontCurve, out: &Fp2Elem) -> Pending {
	let b = b.subcircuit("j_invariant");
	let _span = tracing::debug_span!("j_invariant").entered();
	b.open(|b| {
		let aa = f.allocate(b);
		f.square_add(b, &curve.a, &aa);
		let cc = f.allocate(b);
		f.square_add(b, &curve.c, &cc);

		// A² - 3C²
		let t = f.allocate(b);
		f.copy(b, &aa, &t);
		for _ in 0..3 {
			f.sub(b, &cc, &t);
		}
		let t_sq = f.allocate(b);
		f.square_add(b, &t, &t_sq);
		let num = f.allocate(b);
		f.mul_add(b, &t_sq, &t, &num);
		for _ in 0..8 {
			f.double(b, &num);
		}

		// C⁴ (A² - 4C²)
		let cc_sq = f.allocate(b);
		f.square_add(b, &cc, &cc_sq);
		let t_minus = f.allocate(b);
		f.copy(b, &t, &t_minus);
		f.sub(b, &cc, &t_minus);
		let den = f.allocate(b);
		f.mul_add(b, &cc_sq, &t_minus, &den);

		f.div(b, &den, &num, out);
	})
}

/// Public parameters of an isogeny walk.
#[derive(Debug, Clone)]
pub struct WalkParams {
	/// Starting curve.
	pub curve: classical::MontCurve,
	/// First basis point of the `2^height`-torsion.
	pub p: classical::XzPoint,
	/// Second basis point of the `2^height`-torsion.
	pub q: classical::XzPoint,
	/// `Q - P`.
	pub q_minus_p: classical::XzPoint,
	/// Number of 2-isogeny steps, equal to the bit length of the secret.
	pub height: usize,
}

impl WalkParams {
	/// Parameters for the curve `(A : C)` with the basis found by
	/// [`ExtField::torsion_basis`](classical::ExtField::torsion_basis).
	pub fn new(ext: &classical::ExtField, curve: &classical::MontCurveAc, height: usize) -> Option<Self> {
		let (p, q, q_minus_p) = ext.torsion_basis(curve, height)?;
		Some(Self {
			curve: ext.a24_from_ac(curve),
			p,
			q,
			q_minus_p,
			height,
		})
	}
}

/// `out ^= j(E_h)` where `E_h` is the end of the 2-isogeny walk with kernel `⟨P + [s]Q⟩`.
///
/// The kernel generator is computed with [`ladder3pt`]. At step `i` it is doubled
/// `height - 1 - i` times to expose the order-two point, the codomain is computed with
/// [`isog2_curve`] and the generator is pushed through with [`isog2_point`]. The final curve is
/// converted to `(A : C)` and its j-invariant copied into `out`. `s` is unchanged and every
/// intermediate is uncomputed.
///
/// # Panics
/// Panics if `s` does not have `params.height` bits.
pub fn walk(
	b: &CircuitBuilder,
	f: &Fp2,
	params: &WalkParams,
	s: &Register,
	out: &Fp2Elem,
	strategy: Checkpointing,
) {
	assert_eq!(s.len(), params.height, "secret width must equal the walk height");
	let b = b.subcircuit("walk");
	let _span = tracing::debug_span!("walk", height = params.height, ?strategy).entered();
	let h = params.height;
	let (j, pending) = b.open_with(|b| {
		let mut kernel = XzPoint::allocate(b, f);
		ladder3pt(b, f, &params.curve, &params.p, &params.q, &params.q_minus_p, s, &kernel, strategy);
		let mut curve = MontCurve::allocate(b, f);
		curve.load(b, f, &params.curve);

		for step in 0..h {
			let step_b = b.subcircuit(format!("step{step}"));
			let order_two = XzPoint::allocate(&step_b, f);
			xdble(&step_b, f, &kernel, &curve, h - 1 - step, &order_two, strategy);
			let next = MontCurve::allocate(&step_b, f);
			isog2_curve(&step_b, f, &order_two, &next);
			if step + 1 < h {
				let image = XzPoint::allocate(&step_b, f);
				isog2_point(&step_b, f, &order_two, &kernel, &image);
				kernel = image;
			}
			curve = next;
		}

		a24_to_ac(b, f, &curve);
		let j = f.allocate(b);
		j_invariant_open(b, f, &curve, &j).absorb();
		j
	});
	f.copy(&b, &j, out);
	pending.close();
	f.debug_elem(&b, "j", out);
}
