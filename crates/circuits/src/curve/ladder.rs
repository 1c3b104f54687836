// Copyright 2025 Irreducible Inc.
use revarith_frontend::{CircuitBuilder, Register};

use super::{Chain, Checkpointing, XzPoint, run_chain, xadd};
use crate::{field::Fp2, reference as classical};

/// `out += x(p + [s]q)` by the three-point ladder.
///
/// `p`, `q` and `q - p` are classical, so the doublings of `q` are precomputed and each ladder
/// step costs one differential addition with a classical operand. The state is the pair
/// `(R1, R2)` with `R1 - R2 = [2^i]q`; bit `i` of `s` selects which half absorbs `[2^i]q`.
/// `s` is read least significant bit first and left unchanged.
///
/// `strategy` picks between keeping every intermediate pair and recursive checkpointing.
#[allow(clippy::too_many_arguments)]
pub fn ladder3pt(
	b: &CircuitBuilder,
	f: &Fp2,
	curve: &classical::MontCurve,
	p: &classical::XzPoint,
	q: &classical::XzPoint,
	q_minus_p: &classical::XzPoint,
	s: &Register,
	out: &XzPoint,
	strategy: Checkpointing,
) {
	let b = b.subcircuit("ladder3pt");
	let _span = tracing::debug_span!("ladder3pt", bits = s.len(), ?strategy).entered();
	let ext = f.classical();
	let mut doublings = Vec::with_capacity(s.len());
	let mut r0 = q.clone();
	for _ in 0..s.len() {
		let next = ext.xdbl(&r0, curve);
		doublings.push(r0);
		r0 = next;
	}
	let chain = LadderChain {
		f,
		doublings,
		scalar: s,
	};

	let init = chain.allocate(&b);
	init.0.load(&b, f, p);
	init.1.load(&b, f, q_minus_p);
	let last = chain.allocate(&b);
	let pending = b.open(|b| run_chain(b, &chain, &init, s.len(), &last, strategy));
	last.0.copy_to(&b, f, out);
	pending.close();
	chain.release(&b, last);
	init.1.load(&b, f, q_minus_p);
	init.0.load(&b, f, p);
	chain.release(&b, init);
}

struct LadderChain<'a> {
	f: &'a Fp2,
	/// `[2^i]q` for every step `i`.
	doublings: Vec<classical::XzPoint>,
	scalar: &'a Register,
}

impl Chain for LadderChain<'_> {
	type State = (XzPoint, XzPoint);

	fn allocate(&self, b: &CircuitBuilder) -> Self::State {
		(XzPoint::allocate(b, self.f), XzPoint::allocate(b, self.f))
	}

	fn release(&self, b: &CircuitBuilder, (r1, r2): Self::State) {
		r2.release(b, self.f);
		r1.release(b, self.f);
	}

	fn copy(&self, b: &CircuitBuilder, src: &Self::State, dst: &Self::State) {
		src.0.copy_to(b, self.f, &dst.0);
		src.1.copy_to(b, self.f, &dst.1);
	}

	/// Bit set: `R1 ← R1 + R0` using `R1 - R0 = R2`. Bit clear: `R2 ← R2 - R0` using
	/// `R2 + R0 = R1`. Both are a differential addition of `±R0` to the swapped-in half.
	fn step(&self, b: &CircuitBuilder, i: usize, from: &Self::State, to: &Self::State) {
		let f = self.f;
		let bit = self.scalar[i];
		let (r1, r2) = from;
		let (sum, pending) = b.open_with(|b| {
			r1.cswap(b, f, bit, r2);
			// r2 now holds the half that moves, r1 the difference.
			let sum = XzPoint::allocate(b, f);
			xadd(b, f, &self.doublings[i], r2, r1, &sum);
			sum
		});
		r1.copy_to(b, f, &to.0);
		sum.copy_to(b, f, &to.1);
		pending.close();
		to.0.cswap(b, f, bit, &to.1);
	}
}
