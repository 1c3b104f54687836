// Copyright 2025 Irreducible Inc.
//! Core datatypes shared by the reversible-circuit frontend and the kernel library.
//!
//! Most importantly it hosts the definitions of a [`Qubit`], a [`Register`] and a [`Gate`].

#![warn(missing_docs)]

pub mod consts;
pub mod error;
pub mod gate;
pub mod qubit;
pub mod register;

pub use error::Error;
pub use gate::{Controls, Gate, GateKind};
pub use qubit::Qubit;
pub use register::Register;
