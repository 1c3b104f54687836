// Copyright 2025 Irreducible Inc.
//! [`Qubit`] handle.

use cranelift_entity::entity_impl;

/// A handle to a single bit of reversible state allocated by a builder.
///
/// Compact, only 32-bit. The handle carries no value; the backend owns the state.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qubit(u32);
entity_impl!(Qubit, "q");
