// Copyright 2025 Irreducible Inc.
//! Constants shared by the frontend and the kernel library.

/// Computes the base-2 logarithm of a value, panicking if it's not a power of 2.
const fn checked_log_2(val: usize) -> usize {
	assert!(val.is_power_of_two(), "Value is not a power of 2");
	val.ilog2() as usize
}

/// Simulator state is packed into 64-bit storage words.
pub const STORAGE_WORD_BITS: usize = 64;

/// log2 of [`STORAGE_WORD_BITS`].
pub const LOG_STORAGE_WORD_BITS: usize = checked_log_2(STORAGE_WORD_BITS);

/// Number of controls a [`Gate`](crate::Gate) stores inline before spilling to the heap.
///
/// Kernels seldom nest more predicates than this.
pub const INLINE_CONTROLS: usize = 4;

/// Maximum number of faults a builder keeps verbatim.
///
/// Faults past this limit are still counted.
pub const MAX_RECORDED_FAULTS: usize = 100;

/// Default number of multiplier bits absorbed per Montgomery reduction round.
pub const DEFAULT_MUL_WINDOW: usize = 1;
