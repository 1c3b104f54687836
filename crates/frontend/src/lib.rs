// Copyright 2025 Irreducible Inc.

//! Reversible-circuit frontend.
//!
//! This crate provides the [`CircuitBuilder`] API that every kernel of the arithmetic library is
//! written against. Kernels emit multi-controlled NOT gates on [`Register`]s; the builder applies
//! them to a [`Backend`] immediately.
//!
//! # Usage Flow
//!
//! Create a [`CircuitBuilder`], [`allocate`](CircuitBuilder::allocate) registers and load
//! classical inputs with [`xor_const`](CircuitBuilder::xor_const). Call kernels. Read results
//! with [`measure`](CircuitBuilder::measure), which also resets the register, and release
//! everything. [`check`](CircuitBuilder::check) reports any scratch that was left dirty.
//!
//! Controlled and inverse forms of a kernel are obtained with
//! [`with_control`](CircuitBuilder::with_control) and [`adjoint`](CircuitBuilder::adjoint), or
//! through the [`Reversible`] trait.
//!
//! Use [`GateStat`] to inspect gate counts and peak width, helpful for optimization.

#![warn(missing_docs)]

pub mod backend;
mod builder;
pub mod reversible;
pub mod stat;

pub use backend::{Backend, Simulator, Tally};
pub use builder::{AdderStrategy, CircuitBuilder, Options, Pending};
pub use reversible::Reversible;
pub use revarith_core::{Gate, Qubit, Register};
pub use stat::GateStat;
