// Copyright 2025 Irreducible Inc.
use std::{
	cell::{RefCell, RefMut},
	collections::HashMap,
	rc::Rc,
};

use num_bigint::BigUint;
use num_traits::Zero;
use revarith_core::{
	Error, Gate, Qubit, Register,
	consts::{DEFAULT_MUL_WINDOW, MAX_RECORDED_FAULTS},
};

use crate::{
	backend::{Backend, Simulator},
	stat::{GateStat, Layers},
};

mod arena;
mod pending;
mod scope;
mod tape;

use arena::Arena;
pub use pending::Pending;
use scope::{Scope, ScopeTree};
use tape::{Op, Tape, TapeMode};

/// Adder the integer layer falls back to when a kernel does not ask for a specific one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AdderStrategy {
	/// In-place ripple-carry with one borrowed carry bit.
	#[default]
	Cuccaro,
	/// Ripple-carry with a materialized carry register.
	RippleCarry,
	/// Carries from a parallel-prefix tree.
	Lookahead,
}

impl AdderStrategy {
	fn parse(s: &str) -> Option<Self> {
		match s {
			"cuccaro" => Some(Self::Cuccaro),
			"ripple" => Some(Self::RippleCarry),
			"lookahead" => Some(Self::Lookahead),
			_ => None,
		}
	}
}

/// Options for the builder.
#[derive(Debug, Clone)]
pub struct Options {
	/// Default adder.
	pub adder: AdderStrategy,
	/// Default number of multiplier bits per Montgomery reduction round.
	pub mul_window: usize,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			adder: AdderStrategy::default(),
			mul_window: DEFAULT_MUL_WINDOW,
		}
	}
}

impl Options {
	/// Reads `REVARITH_ADDER` and `REVARITH_WINDOW`, keeping the default for anything unset or
	/// malformed.
	pub fn from_env() -> Self {
		let mut opts = Self::default();
		if let Ok(value) = std::env::var("REVARITH_ADDER") {
			match AdderStrategy::parse(&value) {
				Some(adder) => opts.adder = adder,
				None => tracing::warn!("ignoring unknown REVARITH_ADDER={value}"),
			}
		}
		if let Ok(value) = std::env::var("REVARITH_WINDOW") {
			match value.parse::<usize>() {
				Ok(w) if w > 0 => opts.mul_window = w,
				_ => tracing::warn!("ignoring invalid REVARITH_WINDOW={value}"),
			}
		}
		opts
	}
}

pub(crate) struct Shared {
	backend: Box<dyn Backend>,
	opts: Options,
	arena: Arena,
	controls: Vec<Qubit>,
	tapes: Vec<Tape>,
	scopes: ScopeTree,
	faults: Vec<Error>,
	fault_count: usize,
	stat: GateStat,
	layers: Layers,
}

impl Shared {
	/// Routes `op` through the tape stack and, unless a dry tape swallows it, to the backend.
	fn emit(&mut self, op: Op, scope: Scope) {
		for tape in self.tapes.iter_mut().rev() {
			tape.push(&op);
			if tape.mode == TapeMode::Dry {
				return;
			}
		}
		self.apply(op, scope);
	}

	fn apply(&mut self, op: Op, scope: Scope) {
		match op {
			Op::Gate(gate) => {
				self.stat.count(&gate, &mut self.layers);
				self.backend.apply(&gate);
			}
			Op::Alloc(reg) => {
				for q in &reg {
					self.backend.allocate(q);
				}
				self.stat.grow(reg.len());
			}
			Op::Release(reg) => {
				let mut value = BigUint::zero();
				for (i, q) in reg.iter().enumerate() {
					if self.backend.release(q) {
						value.set_bit(i as u64, true);
					}
				}
				self.stat.shrink(reg.len());
				if !value.is_zero() {
					let path = self.scopes.path(scope);
					self.note_fault(Error::DirtyRelease {
						path,
						width: reg.len(),
						value,
					});
				}
			}
		}
	}

	#[cold]
	fn note_fault(&mut self, fault: Error) {
		tracing::warn!("{fault}");
		self.fault_count += 1;
		if self.faults.len() < MAX_RECORDED_FAULTS {
			self.faults.push(fault);
		}
	}

	fn read(&self, reg: &Register) -> BigUint {
		let mut value = BigUint::zero();
		for (i, q) in reg.iter().enumerate() {
			if self.backend.read(q) {
				value.set_bit(i as u64, true);
			}
		}
		value
	}
}

/// Builder and runner of reversible circuits.
///
/// `CircuitBuilder` is the single interface kernels talk to. Gates are applied to a [`Backend`]
/// the moment they are emitted, so a kernel is "run" simply by calling it.
///
/// # Gate Model
///
/// Every gate is a multi-controlled NOT ([`Gate`]). X, CNOT and Toffoli are the usual special
/// cases. These are classical reversible permutations, which is why a bit-vector
/// [`Simulator`] is a faithful backend for all kernels built on top.
///
/// # Predication
///
/// [`with_control`] pushes a qubit onto the control stack; every gate emitted while it is
/// pushed is additionally conditioned on it. A kernel therefore never needs a hand-written
/// controlled form: calling it inside `with_control` is its controlled form. With the control
/// false, all gates are no-ops, including those on scratch.
///
/// # Adjoints and Open Operations
///
/// [`adjoint`] records a closure on a dry tape without touching the backend and then plays the
/// recording backwards. Since every gate is self-inverse this is the exact inverse.
///
/// [`open`] runs a closure for real while also recording it, and returns the recording as a
/// [`Pending`] token. Closing the token plays the recording backwards, which restores every
/// register the closure touched, dirty scratch included.
///
/// Recordings may allocate and release scratch. Scratch allocated by a recording is allocated
/// afresh when the recording is replayed; replays rename qubits consistently when the original
/// indices are no longer free.
///
/// # Faults
///
/// Releasing a register that is not zero, or dropping a [`Pending`] without consuming it, is
/// recorded as a fault under the current [`subcircuit`] path. [`check`] reports them.
///
/// # Sharing
///
/// The builder uses reference-counted sharing internally. [`subcircuit`] returns a builder
/// referencing the same state with a nested name.
///
/// [`adjoint`]: Self::adjoint
/// [`check`]: Self::check
/// [`open`]: Self::open
/// [`subcircuit`]: Self::subcircuit
/// [`with_control`]: Self::with_control
#[derive(Clone)]
pub struct CircuitBuilder {
	/// Current scope at which this circuit builder is positioned.
	scope: Scope,
	shared: Rc<RefCell<Shared>>,
}

impl Default for CircuitBuilder {
	fn default() -> Self {
		CircuitBuilder::new()
	}
}

impl CircuitBuilder {
	/// Creates a builder over a fresh [`Simulator`] with options from the environment.
	pub fn new() -> Self {
		Self::with_options(Options::from_env())
	}

	/// Creates a builder over a fresh [`Simulator`] with the given options.
	pub fn with_options(opts: Options) -> Self {
		Self::with_backend(Box::new(Simulator::new()), opts)
	}

	/// Creates a builder over the given backend.
	pub fn with_backend(backend: Box<dyn Backend>, opts: Options) -> Self {
		let scopes = ScopeTree::new();
		CircuitBuilder {
			scope: scopes.root(),
			shared: Rc::new(RefCell::new(Shared {
				backend,
				opts,
				arena: Arena::default(),
				controls: Vec::new(),
				tapes: Vec::new(),
				scopes,
				faults: Vec::new(),
				fault_count: 0,
				stat: GateStat::default(),
				layers: Layers::default(),
			})),
		}
	}

	/// Creates a reference to the same underlying builder that is namespaced to the given name.
	///
	/// Faults raised through the returned builder carry the nested name.
	pub fn subcircuit(&self, name: impl Into<String>) -> CircuitBuilder {
		let scope = self.shared_mut().scopes.child(self.scope, name);
		CircuitBuilder {
			scope,
			shared: self.shared.clone(),
		}
	}

	fn shared_mut(&self) -> RefMut<'_, Shared> {
		self.shared.borrow_mut()
	}

	/// The options this builder was created with.
	pub fn options(&self) -> Options {
		self.shared.borrow().opts.clone()
	}

	/// Dotted name of the current subcircuit.
	pub fn path(&self) -> String {
		self.shared.borrow().scopes.path(self.scope)
	}

	/// Allocates an `n`-bit register in the zero state.
	pub fn allocate(&self, n: usize) -> Register {
		let mut shared = self.shared_mut();
		let reg = shared.arena.take(n);
		shared.emit(Op::Alloc(reg.clone()), self.scope);
		reg
	}

	/// Returns `reg` to the pool.
	///
	/// The register must be zero. If it is not, a fault is recorded and the backend clears it.
	pub fn release(&self, reg: Register) {
		let mut shared = self.shared_mut();
		shared.emit(Op::Release(reg.clone()), self.scope);
		shared.arena.give_back(&reg);
	}

	/// Allocates `n` zero qubits for the duration of `f` and releases them afterwards.
	///
	/// `f` must return the scratch to zero.
	pub fn with_ancilla<R>(&self, n: usize, f: impl FnOnce(&CircuitBuilder, &Register) -> R) -> R {
		let scratch = self.allocate(n);
		let out = f(self, &scratch);
		self.release(scratch);
		out
	}

	/// Emits `gate`, conditioned on every qubit of the control stack.
	pub fn gate(&self, gate: Gate) {
		let mut shared = self.shared_mut();
		let gate = gate.controlled_by(&shared.controls);
		shared.emit(Op::Gate(gate), self.scope);
	}

	/// NOT.
	pub fn x(&self, target: Qubit) {
		self.gate(Gate::x(target));
	}

	/// Controlled NOT.
	pub fn cnot(&self, control: Qubit, target: Qubit) {
		self.gate(Gate::cnot(control, target));
	}

	/// Toffoli.
	pub fn ccnot(&self, c0: Qubit, c1: Qubit, target: Qubit) {
		self.gate(Gate::ccnot(c0, c1, target));
	}

	/// NOT controlled on all of `controls`.
	pub fn mcx(&self, controls: &[Qubit], target: Qubit) {
		self.gate(Gate::mcx(controls, target));
	}

	/// Exchanges two qubits.
	pub fn swap(&self, a: Qubit, b: Qubit) {
		self.cnot(a, b);
		self.cnot(b, a);
		self.cnot(a, b);
	}

	/// Exchanges `a` and `b` if `control` is set.
	pub fn cswap(&self, control: Qubit, a: Qubit, b: Qubit) {
		self.cnot(b, a);
		self.ccnot(control, a, b);
		self.cnot(b, a);
	}

	/// Flips every bit of `reg`.
	pub fn not(&self, reg: &Register) {
		for q in reg {
			self.x(q);
		}
	}

	/// `dst ^= src`, bitwise.
	///
	/// # Panics
	/// Panics if the widths differ.
	pub fn copy(&self, src: &Register, dst: &Register) {
		assert_eq!(src.len(), dst.len(), "copy: registers must have the same width");
		for (s, d) in src.iter().zip(dst.iter()) {
			self.cnot(s, d);
		}
	}

	/// `reg ^= value`.
	///
	/// # Panics
	/// Panics if `value` does not fit in `reg`.
	pub fn xor_const(&self, reg: &Register, value: &BigUint) {
		assert!(
			value.bits() as usize <= reg.len(),
			"xor_const: value {value} does not fit in {} bits",
			reg.len()
		);
		for (i, q) in reg.iter().enumerate() {
			if value.bit(i as u64) {
				self.x(q);
			}
		}
	}

	/// Runs `f` with `control` pushed onto the control stack.
	pub fn with_control<R>(&self, control: Qubit, f: impl FnOnce(&CircuitBuilder) -> R) -> R {
		self.with_controls(&[control], f)
	}

	/// Runs `f` with all of `controls` pushed onto the control stack.
	pub fn with_controls<R>(&self, controls: &[Qubit], f: impl FnOnce(&CircuitBuilder) -> R) -> R {
		let depth = {
			let mut shared = self.shared_mut();
			let depth = shared.controls.len();
			shared.controls.extend_from_slice(controls);
			depth
		};
		let out = f(self);
		self.shared_mut().controls.truncate(depth);
		out
	}

	/// Runs `f` conditioned on `control == value`.
	pub fn with_control_value<R>(
		&self,
		control: Qubit,
		value: bool,
		f: impl FnOnce(&CircuitBuilder) -> R,
	) -> R {
		if !value {
			self.x(control);
		}
		let out = self.with_control(control, f);
		if !value {
			self.x(control);
		}
		out
	}

	/// Runs the exact inverse of `f`.
	///
	/// `f` is recorded without being applied and then replayed backwards. `f` must not read any
	/// register and must release every register it allocates.
	///
	/// # Panics
	/// Panics if `f` leaves a register allocated or releases one it did not allocate.
	pub fn adjoint<R>(&self, f: impl FnOnce(&CircuitBuilder) -> R) -> R {
		let (out, tape) = self.record(TapeMode::Dry, f);
		tape.assert_balanced("adjoint");
		self.replay_reversed(tape.ops);
		out
	}

	/// Runs `f` and returns the token that undoes it.
	///
	/// Use this for operations that leave scratch dirty: the caller copies what it needs out of
	/// the result and then closes the token.
	pub fn open(&self, f: impl FnOnce(&CircuitBuilder)) -> Pending {
		self.open_with(f).1
	}

	/// Same as [`open`](Self::open), also returning the closure's result.
	pub fn open_with<R>(&self, f: impl FnOnce(&CircuitBuilder) -> R) -> (R, Pending) {
		let (out, tape) = self.record(TapeMode::Trace, f);
		(out, Pending::new(self.clone(), tape.ops))
	}

	fn record<R>(&self, mode: TapeMode, f: impl FnOnce(&CircuitBuilder) -> R) -> (R, Tape) {
		let depth = {
			let mut shared = self.shared_mut();
			shared.tapes.push(Tape::new(mode, self.scope));
			shared.tapes.len()
		};
		let out = f(self);
		let mut shared = self.shared_mut();
		assert_eq!(shared.tapes.len(), depth, "recording scopes must nest");
		let tape = shared.tapes.pop().expect("tape pushed above");
		debug_assert_eq!(tape.scope, self.scope);
		(out, tape)
	}

	pub(crate) fn replay_reversed(&self, ops: Vec<Op>) {
		let mut shared = self.shared_mut();
		let mut rename: HashMap<Qubit, Qubit> = HashMap::new();
		for op in ops.into_iter().rev() {
			match op {
				Op::Gate(gate) => {
					let gate = if rename.is_empty() {
						gate
					} else {
						gate.map_qubits(|q| rename.get(&q).copied().unwrap_or(q))
					};
					shared.emit(Op::Gate(gate), self.scope);
				}
				Op::Release(reg) => {
					let fresh = shared.arena.take_preferring(&reg);
					for (old, new) in reg.iter().zip(fresh.iter()) {
						if old == new {
							rename.remove(&old);
						} else {
							rename.insert(old, new);
						}
					}
					shared.emit(Op::Alloc(fresh), self.scope);
				}
				Op::Alloc(reg) => {
					let actual: Register = reg
						.iter()
						.map(|q| rename.remove(&q).unwrap_or(q))
						.collect();
					shared.emit(Op::Release(actual.clone()), self.scope);
					shared.arena.give_back(&actual);
				}
			}
		}
	}

	/// Returns `true` inside [`adjoint`](Self::adjoint) or [`open`](Self::open).
	pub fn is_recording(&self) -> bool {
		!self.shared.borrow().tapes.is_empty()
	}

	/// Reads `reg` and resets it to zero.
	///
	/// # Panics
	/// Panics while recording.
	pub fn measure(&self, reg: &Register) -> BigUint {
		let mut shared = self.shared_mut();
		assert!(shared.tapes.is_empty(), "measure: cannot read a register while recording");
		let value = shared.read(reg);
		for (i, q) in reg.iter().enumerate() {
			if value.bit(i as u64) {
				shared.backend.apply(&Gate::x(q));
			}
		}
		shared.stat.measured(reg.len());
		value
	}

	/// Reads `reg` without disturbing it.
	///
	/// # Panics
	/// Panics while recording.
	pub fn peek(&self, reg: &Register) -> BigUint {
		let shared = self.shared.borrow();
		assert!(shared.tapes.is_empty(), "peek: cannot read a register while recording");
		shared.read(reg)
	}

	/// Logs the value of `reg` at debug level. Informational only.
	pub fn debug_register(&self, label: &str, reg: &Register) {
		let shared = self.shared.borrow();
		let path = shared.scopes.path(self.scope);
		if shared.tapes.is_empty() {
			let value = shared.read(reg);
			tracing::debug!(%path, label, %value, width = reg.len());
		} else {
			tracing::debug!(%path, label, "value unavailable while recording");
		}
	}

	/// Snapshot of the gate counters.
	pub fn stat(&self) -> GateStat {
		self.shared.borrow().stat.clone()
	}

	/// Number of faults recorded so far, including those not kept verbatim.
	pub fn fault_count(&self) -> usize {
		self.shared.borrow().fault_count
	}

	pub(crate) fn note_unconsumed(&self) {
		let mut shared = self.shared_mut();
		let path = shared.scopes.path(self.scope);
		shared.note_fault(Error::UnconsumedCleanup { path });
	}

	/// Returns and clears every recorded fault, or `Ok` if there are none.
	pub fn check(&self) -> Result<(), Error> {
		let mut shared = self.shared_mut();
		if shared.fault_count == 0 {
			return Ok(());
		}
		let total_count = std::mem::take(&mut shared.fault_count);
		Err(Error::Faults {
			faults: std::mem::take(&mut shared.faults),
			total_count,
		})
	}
}
