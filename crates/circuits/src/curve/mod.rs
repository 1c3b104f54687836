// Copyright 2025 Irreducible Inc.
//! Elliptic-curve kernels.
//!
//! Two models are covered. Short Weierstrass curves over `F_p` use affine coordinates in
//! Montgomery-form [`ZMod`] registers ([`AffinePoint`], [`affine_add`], [`table_add`]).
//! Montgomery curves over the extension [`Fp2`] use x-only projective coordinates
//! ([`XzPoint`], [`xdbl`], [`xadd`], [`ladder3pt`]) with curve constants in the
//! `(A24+ : C24) = (A + 2C : 4C)` convention.
//!
//! Long sequential computations such as the ladder run through [`run_chain`], which offers a
//! choice between keeping every intermediate and recursive checkpointing.

mod affine;
mod chain;
mod ladder;
mod table;
mod xz;


pub use affine::affine_add;
pub use chain::{Chain, Checkpointing, run_chain};
pub use ladder::ladder3pt;
use revarith_frontend::{CircuitBuilder, Qubit, Register};
pub use table::{signed_table_add, table_add};
pub use xz::{a24_to_ac, ac_to_a24, xadd, xdbl};

use crate::{
	field::{Fp2, Fp2Elem},
	modular::ZMod,
	reference as classical,
};

/// Affine point `(x, y)` of a Weierstrass curve, with a flag telling it apart from infinity.
#[derive(Debug, Clone)]
pub struct AffinePoint {
	/// x-coordinate.
	pub x: Register,
	/// y-coordinate.
	pub y: Register,
	/// Set for finite points, clear for the point at infinity.
	pub finite: Qubit,
}

impl AffinePoint {
	/// Allocates a zero point, i.e. the point at infinity with zero coordinates.
	pub fn allocate(b: &CircuitBuilder, zm: &ZMod) -> Self {
		let block = b.allocate(2 * zm.width() + 1);
		Self::from_block(&block, zm.width())
	}

	fn from_block(block: &Register, n: usize) -> Self {
		Self {
			x: block.slice(0..n),
			y: block.slice(n..2 * n),
			finite: block[2 * n],
		}
	}

	fn block(&self) -> Register {
		self.x.concat(&self.y).with_msb(self.finite)
	}

	/// Releases the point, which must be zero.
	pub fn release(self, b: &CircuitBuilder) {
		b.release(self.block());
	}

	/// XORs the encoding of `pt` into the registers.
	pub fn load(&self, b: &CircuitBuilder, zm: &ZMod, pt: &classical::AffinePoint) {
		if !pt.finite {
			return;
		}
		zm.load(b, &self.x, &pt.x);
		zm.load(b, &self.y, &pt.y);
		b.x(self.finite);
	}

	/// Reads the point without disturbing it.
	pub fn peek(&self, b: &CircuitBuilder, zm: &ZMod) -> classical::AffinePoint {
		let finite = b.peek(&Register::new(vec![self.finite])).bit(0);
		if !finite {
			return classical::AffinePoint::identity();
		}
		classical::AffinePoint::new(zm.decode(&b.peek(&self.x)), zm.decode(&b.peek(&self.y)))
	}
}

/// Projective x-only point `(X : Z)` over the extension field.
#[derive(Debug, Clone)]
pub struct XzPoint {
	/// Numerator.
	pub x: Fp2Elem,
	/// Denominator.
	pub z: Fp2Elem,
}

impl XzPoint {
	/// Allocates `(0 : 0)`.
	pub fn allocate(b: &CircuitBuilder, f: &Fp2) -> Self {
		Self {
			x: f.allocate(b),
			z: f.allocate(b),
		}
	}

	/// Releases the point, which must be zero.
	pub fn release(self, b: &CircuitBuilder, f: &Fp2) {
		f.release(b, self.z);
		f.release(b, self.x);
	}

	/// XORs the encoding of `pt` into the registers.
	pub fn load(&self, b: &CircuitBuilder, f: &Fp2, pt: &classical::XzPoint) {
		f.load(b, &self.x, &pt.x);
		f.load(b, &self.z, &pt.z);
	}

	/// Reads the point without disturbing it.
	pub fn peek(&self, b: &CircuitBuilder, f: &Fp2) -> classical::XzPoint {
		classical::XzPoint::new(f.peek(b, &self.x), f.peek(b, &self.z))
	}

	/// `dst ^= self`.
	pub fn copy_to(&self, b: &CircuitBuilder, f: &Fp2, dst: &XzPoint) {
		f.copy(b, &self.x, &dst.x);
		f.copy(b, &self.z, &dst.z);
	}

	/// Exchanges `self` and `other` if `control` is set.
	pub fn cswap(&self, b: &CircuitBuilder, f: &Fp2, control: Qubit, other: &XzPoint) {
		f.cswap(b, control, &self.x, &other.x);
		f.cswap(b, control, &self.z, &other.z);
	}
}

/// Projective coefficients of a Montgomery curve `C·y² = x³ + (A/C)·C·x² + C·x`, up to a common
/// factor.
///
/// The same registers hold either `(A : C)` or `(A24+ : C24)`; [`ac_to_a24`] and [`a24_to_ac`]
/// convert in place. Kernels taking a `MontCurve` expect the `(A24+ : C24)` convention unless
/// stated otherwise.
#[derive(Debug, Clone)]
pub struct MontCurve {
	/// `A` or `A24+ = A + 2C`.
	pub a: Fp2Elem,
	/// `C` or `C24 = 4C`.
	pub c: Fp2Elem,
}

impl MontCurve {
	/// Allocates zero coefficients.
	pub fn allocate(b: &CircuitBuilder, f: &Fp2) -> Self {
		Self {
			a: f.allocate(b),
			c: f.allocate(b),
		}
	}

	/// Releases the coefficients, which must be zero.
	pub fn release(self, b: &CircuitBuilder, f: &Fp2) {
		f.release(b, self.c);
		f.release(b, self.a);
	}

	/// XORs `(A24+ : C24)` of `curve` into the registers.
	pub fn load(&self, b: &CircuitBuilder, f: &Fp2, curve: &classical::MontCurve) {
		f.load(b, &self.a, &curve.a24);
		f.load(b, &self.c, &curve.c24);
	}

	/// Reads the coefficients as `(A24+ : C24)`.
	pub fn peek(&self, b: &CircuitBuilder, f: &Fp2) -> classical::MontCurve {
		classical::MontCurve {
			a24: f.peek(b, &self.a),
			c24: f.peek(b, &self.c),
		}
	}

	/// Reads the coefficients as `(A : C)`.
	pub fn peek_ac(&self, b: &CircuitBuilder, f: &Fp2) -> classical::MontCurveAc {
		classical::MontCurveAc {
			a: f.peek(b, &self.a),
			c: f.peek(b, &self.c),
		}
	}
}
