// Copyright 2025 Irreducible Inc.
//! Reversible evaluation of a sequence of steps `s_0 → s_1 → … → s_len`.
//!
//! A step maps one state into a fresh zero state and leaves its input untouched, so step `i` can
//! be undone by running it adjoint with the same input. [`Checkpointing::KeepAll`] keeps every
//! intermediate state live until the end. [`Checkpointing::Recursive`] only keeps the states on
//! the current path of a binary split, trading `len^log₂3` steps for `O(log len)` live states.

use revarith_frontend::CircuitBuilder;

/// A sequence of reversible state transitions.
pub trait Chain {
	/// The registers making up one state.
	type State;

	/// Allocates a zero state.
	fn allocate(&self, b: &CircuitBuilder) -> Self::State;

	/// Releases a zero state.
	fn release(&self, b: &CircuitBuilder, state: Self::State);

	/// `dst ^= src`.
	fn copy(&self, b: &CircuitBuilder, src: &Self::State, dst: &Self::State);

	/// Writes the successor of `from` under step `i` into the zero state `to`.
	///
	/// Must leave `from` and all scratch unchanged.
	fn step(&self, b: &CircuitBuilder, i: usize, from: &Self::State, to: &Self::State);
}

/// How [`run_chain`] trades live states for recomputation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Checkpointing {
	/// Every intermediate state stays allocated until the result is copied out.
	#[default]
	KeepAll,
	/// Recursive halving: intermediates are recomputed instead of stored.
	Recursive,
}

/// Writes the state reached after `len` steps from `init` into the zero state `out`.
///
/// `init` is unchanged and no other state survives the call.
pub fn run_chain<C: Chain>(
	b: &CircuitBuilder,
	chain: &C,
	init: &C::State,
	len: usize,
	out: &C::State,
	strategy: Checkpointing,
) {
	match strategy {
		Checkpointing::KeepAll => keep_all(b, chain, init, len, out),
		Checkpointing::Recursive => advance(b, chain, init, 0, len, out),
	}
}

fn keep_all<C: Chain>(b: &CircuitBuilder, chain: &C, init: &C::State, len: usize, out: &C::State) {
	let mut states: Vec<C::State> = Vec::with_capacity(len);
	for i in 0..len {
		let next = chain.allocate(b);
		let prev = if i == 0 { init } else { &states[i - 1] };
		chain.step(b, i, prev, &next);
		states.push(next);
	}
	chain.copy(b, states.last().unwrap_or(init), out);
	for i in (0..len).rev() {
		let Some(state) = states.pop() else { break };
		let prev = states.last().unwrap_or(init);
		b.adjoint(|b| chain.step(b, i, prev, &state));
		chain.release(b, state);
	}
}

/// Writes state `j` into `out` given state `i` in `from`.
fn advance<C: Chain>(
	b: &CircuitBuilder,
	chain: &C,
	from: &C::State,
	i: usize,
	j: usize,
	out: &C::State,
) {
	match j - i {
		0 => chain.copy(b, from, out),
		1 => chain.step(b, i, from, out),
		span => {
			let m = i + span / 2;
			let mid = chain.allocate(b);
			advance(b, chain, from, i, m, &mid);
			advance(b, chain, &mid, m, j, out);
			b.adjoint(|b| advance(b, chain, from, i, m, &mid));
			chain.release(b, mid);
		}
	}
}

#[cfg(test)]
mod tests {
	use num_bigint::BigUint;
	use revarith_frontend::Register;

	use super::*;
	use crate::{integer, testing::builder};

	/// `s_{i+1} = s_i + i + 1` on 8-bit registers.
	struct Counter;

	impl Chain for Counter {
		type State = Register;

		fn allocate(&self, b: &CircuitBuilder) -> Register {
			b.allocate(8)
		}

		fn release(&self, b: &CircuitBuilder, state: Register) {
			b.release(state);
		}

		fn copy(&self, b: &CircuitBuilder, src: &Register, dst: &Register) {
			b.copy(src, dst);
		}

		fn step(&self, b: &CircuitBuilder, i: usize, from: &Register, to: &Register) {
			b.copy(from, to);
			integer::add_const(b, &BigUint::from(i + 1), to, None);
		}
	}

	#[test]
	fn test_strategies_agree_and_clean_up() {
		for strategy in [Checkpointing::KeepAll, Checkpointing::Recursive] {
			for len in 0..9usize {
				let b = builder();
				let init = b.allocate(8);
				b.xor_const(&init, &BigUint::from(3u32));
				let out = b.allocate(8);
				let width_before = b.stat().width;
				run_chain(&b, &Counter, &init, len, &out, strategy);
				assert_eq!(b.stat().width, width_before);
				assert_eq!(b.peek(&out), BigUint::from(3 + len * (len + 1) / 2), "{strategy:?} {len}");
				assert_eq!(b.peek(&init), BigUint::from(3u32));
				b.check().unwrap();
			}
		}
	}

	#[test]
	fn test_recursive_uses_fewer_qubits() {
		let peak = |strategy| {
			let b = builder();
			let init = b.allocate(8);
			let out = b.allocate(8);
			run_chain(&b, &Counter, &init, 16, &out, strategy);
			b.stat().peak_width
		};
		assert!(peak(Checkpointing::Recursive) < peak(Checkpointing::KeepAll));
	}
}
