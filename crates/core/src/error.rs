// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the core crate.

use num_bigint::BigUint;

use crate::consts::MAX_RECORDED_FAULTS;

/// Contract violations observed while running a circuit.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{path}: released {width}-bit register is not zero (value {value:#x})")]
	DirtyRelease {
		path: String,
		width: usize,
		value: BigUint,
	},
	#[error("{path}: open operation dropped without closing its pending cleanup")]
	UnconsumedCleanup { path: String },
	#[error("{}", fmt_faults(.faults, .total_count))]
	Faults { faults: Vec<Error>, total_count: usize },
}

fn fmt_faults(faults: &[Error], total_count: &usize) -> String {
	let total_count = *total_count;
	let mut out = format!("{total_count} fault(s) recorded:");
	for fault in faults {
		out.push_str("\n  ");
		out.push_str(&fault.to_string());
	}
	if total_count > faults.len() {
		out.push_str(&format!(
			"\n  ... and {} more (only the first {MAX_RECORDED_FAULTS} are kept)",
			total_count - faults.len()
		));
	}
	out
}
