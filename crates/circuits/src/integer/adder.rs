// Copyright 2025 Irreducible Inc.
use itertools::izip;
use revarith_frontend::{AdderStrategy, CircuitBuilder, Qubit, Register};

/// An in-place adder of two equally wide registers.
///
/// `add` replaces `y` with `(x + y) mod 2ⁿ` and flips `carry`, if given, iff `x + y ≥ 2ⁿ`.
/// `x` is unchanged. Its adjoint is the matching subtraction, with `carry` receiving the borrow.
pub trait Adder {
	/// `y += x`, carry-out XORed into `carry`.
	fn add(&self, b: &CircuitBuilder, x: &Register, y: &Register, carry: Option<Qubit>);

	/// `t ^= [x + y ≥ 2ⁿ]`, leaving `x` and `y` unchanged.
	fn carry(&self, b: &CircuitBuilder, x: &Register, y: &Register, t: Qubit) {
		self.add(b, x, y, Some(t));
		b.adjoint(|b| self.add(b, x, y, None));
	}
}

/// Returns the adder implementing `strategy`.
pub fn adder_for(strategy: AdderStrategy) -> &'static dyn Adder {
	match strategy {
		AdderStrategy::Cuccaro => &CuccaroAdder,
		AdderStrategy::RippleCarry => &RippleCarryAdder,
		AdderStrategy::Lookahead => &LookaheadAdder,
	}
}

fn assert_same_width(x: &Register, y: &Register) {
	assert_eq!(x.len(), y.len(), "adder: operands must have the same width");
}

/// Cuccaro-Draper-Kutin-Moulton ripple-carry adder.
///
/// Carries ripple through `x` itself, so the only scratch is one borrowed carry-in bit.
#[derive(Debug, Default, Copy, Clone)]
pub struct CuccaroAdder;

fn maj(b: &CircuitBuilder, c: Qubit, y: Qubit, x: Qubit) {
	b.cnot(x, y);
	b.cnot(x, c);
	b.ccnot(c, y, x);
}

fn uma(b: &CircuitBuilder, c: Qubit, y: Qubit, x: Qubit) {
	b.ccnot(c, y, x);
	b.cnot(x, c);
	b.cnot(c, y);
}

/// Leaves the carry out of bit `i` in `x[i]`.
fn maj_chain(b: &CircuitBuilder, z: Qubit, x: &Register, y: &Register) {
	let mut c = z;
	for (xi, yi) in x.iter().zip(y.iter()) {
		maj(b, c, yi, xi);
		c = xi;
	}
}

fn uma_chain(b: &CircuitBuilder, z: Qubit, x: &Register, y: &Register) {
	for i in (0..x.len()).rev() {
		let c = if i == 0 { z } else { x[i - 1] };
		uma(b, c, y[i], x[i]);
	}
}

impl Adder for CuccaroAdder {
	fn add(&self, b: &CircuitBuilder, x: &Register, y: &Register, carry: Option<Qubit>) {
		assert_same_width(x, y);
		if x.is_empty() {
			return;
		}
		b.with_ancilla(1, |b, z| {
			maj_chain(b, z[0], x, y);
			if let Some(carry) = carry {
				b.cnot(x.msb(), carry);
			}
			uma_chain(b, z[0], x, y);
		});
	}

	fn carry(&self, b: &CircuitBuilder, x: &Register, y: &Register, t: Qubit) {
		assert_same_width(x, y);
		if x.is_empty() {
			return;
		}
		b.with_ancilla(1, |b, z| {
			maj_chain(b, z[0], x, y);
			b.cnot(x.msb(), t);
			b.adjoint(|b| maj_chain(b, z[0], x, y));
		});
	}
}

/// Adders that materialize all carries in a register before writing the sum.
///
/// `xor_carries` must XOR the carry out of every bit position `i` of `x + y` into `c[i]` and
/// leave `x` and `y` unchanged. Its adjoint clears carries it produced.
trait CarryNetwork {
	fn xor_carries(&self, b: &CircuitBuilder, x: &Register, y: &Register, c: &Register);
}

/// The carries of `x + ¬s` are the carries of `x + y` when `s = x + y`, which is what lets the
/// carry register be cleared after the sum is written.
fn add_via_carries(
	net: &impl CarryNetwork,
	b: &CircuitBuilder,
	x: &Register,
	y: &Register,
	carry: Option<Qubit>,
) {
	assert_same_width(x, y);
	let n = x.len();
	if n == 0 {
		return;
	}
	b.with_ancilla(n, |b, c| {
		net.xor_carries(b, x, y, c);
		if let Some(carry) = carry {
			b.cnot(c[n - 1], carry);
		}
		for i in 0..n {
			b.cnot(x[i], y[i]);
			if i > 0 {
				b.cnot(c[i - 1], y[i]);
			}
		}
		b.not(y);
		b.adjoint(|b| net.xor_carries(b, x, y, c));
		b.not(y);
	});
}

/// Textbook ripple-carry adder with an explicit carry register.
#[derive(Debug, Default, Copy, Clone)]
pub struct RippleCarryAdder;

impl CarryNetwork for RippleCarryAdder {
	fn xor_carries(&self, b: &CircuitBuilder, x: &Register, y: &Register, c: &Register) {
		for i in 0..x.len() {
			b.ccnot(x[i], y[i], c[i]);
			if i > 0 {
				b.cnot(x[i], y[i]);
				b.ccnot(c[i - 1], y[i], c[i]);
				b.cnot(x[i], y[i]);
			}
		}
	}
}

impl Adder for RippleCarryAdder {
	fn add(&self, b: &CircuitBuilder, x: &Register, y: &Register, carry: Option<Qubit>) {
		add_via_carries(self, b, x, y, carry);
	}
}

/// Carry-lookahead adder.
///
/// Generate and propagate signals are combined by a Kogge-Stone prefix tree of depth
/// `⌈log₂ n⌉`. Each tree level is materialized out of place and the whole tree is undone after
/// the carries are copied out.
#[derive(Debug, Default, Copy, Clone)]
pub struct LookaheadAdder;

/// Returns the register holding the group generate signal of bits `0..=i` at position `i`.
fn prefix_tree(b: &CircuitBuilder, x: &Register, y: &Register) -> Register {
	let n = x.len();
	let mut g = b.allocate(n);
	let mut p = b.allocate(n);
	for (xi, yi, gi, pi) in izip!(x, y, &g, &p) {
		b.ccnot(xi, yi, gi);
		b.cnot(xi, pi);
		b.cnot(yi, pi);
	}
	let mut d = 1;
	while d < n {
		let next_g = b.allocate(n);
		let next_p = b.allocate(n);
		for i in 0..n {
			b.cnot(g[i], next_g[i]);
			if i >= d {
				// Generate and propagate over the same span are never both set.
				b.ccnot(p[i], g[i - d], next_g[i]);
				b.ccnot(p[i], p[i - d], next_p[i]);
			}
		}
		g = next_g;
		p = next_p;
		d *= 2;
	}
	g
}

impl CarryNetwork for LookaheadAdder {
	fn xor_carries(&self, b: &CircuitBuilder, x: &Register, y: &Register, c: &Register) {
		let (g, tree) = b.open_with(|b| prefix_tree(b, x, y));
		b.copy(&g, c);
		tree.close();
	}
}

impl Adder for LookaheadAdder {
	fn add(&self, b: &CircuitBuilder, x: &Register, y: &Register, carry: Option<Qubit>) {
		add_via_carries(self, b, x, y, carry);
	}
}
