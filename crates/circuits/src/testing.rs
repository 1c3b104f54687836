// Copyright 2025 Irreducible Inc.
//! Helpers shared by the unit tests of all kernel layers.

use num_bigint::BigUint;
use rand::{Rng, rngs::StdRng};
use revarith_frontend::{AdderStrategy, CircuitBuilder, Options, Register};

pub const ALL_ADDERS: [AdderStrategy; 3] =
	[AdderStrategy::Cuccaro, AdderStrategy::RippleCarry, AdderStrategy::Lookahead];

/// A simulator-backed builder that ignores the environment.
pub fn builder() -> CircuitBuilder {
	CircuitBuilder::with_options(Options::default())
}

pub fn builder_with(adder: AdderStrategy) -> CircuitBuilder {
	CircuitBuilder::with_options(Options {
		adder,
		..Options::default()
	})
}

/// Allocates an `n`-bit register holding `value`.
pub fn load(b: &CircuitBuilder, n: usize, value: impl Into<BigUint>) -> Register {
	let reg = b.allocate(n);
	b.xor_const(&reg, &value.into());
	reg
}

pub fn random_bits(rng: &mut StdRng, n: usize) -> BigUint {
	let bytes: Vec<u8> = (0..n.div_ceil(8)).map(|_| rng.random()).collect();
	BigUint::from_bytes_le(&bytes) % (BigUint::from(1u32) << n)
}

/// Uniform in `[0, m)`.
pub fn random_below(rng: &mut StdRng, m: &BigUint) -> BigUint {
	let n = m.bits() as usize;
	loop {
		let v = random_bits(rng, n);
		if &v < m {
			return v;
		}
	}
}
