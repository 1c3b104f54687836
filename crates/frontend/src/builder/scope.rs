// Copyright 2025 Irreducible Inc.
use std::collections::HashMap;

use cranelift_entity::PrimaryMap;

/// A named position in the hierarchy of subcircuits.
///
/// Compact, only 32-bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(u32);
cranelift_entity::entity_impl!(Scope);

struct Node {
	name: String,
	parent: Scope,
}

/// Interned tree of subcircuit names.
///
/// Kernels open a child scope for every sub-operation they call, so a fault can be reported as
/// `walk.step.isogeny_point.mul` rather than a bare qubit index.
pub(crate) struct ScopeTree {
	root: Scope,
	nodes: PrimaryMap<Scope, Node>,
	children: HashMap<(Scope, String), Scope>,
}

impl ScopeTree {
	pub(crate) fn new() -> Self {
		let mut nodes = PrimaryMap::new();
		let root = nodes.push(Node {
			name: String::new(),
			parent: Scope(0),
		});
		Self {
			root,
			nodes,
			children: HashMap::new(),
		}
	}

	pub(crate) fn root(&self) -> Scope {
		self.root
	}

	/// Returns the child of `parent` called `name`, creating it on first use.
	pub(crate) fn child(&mut self, parent: Scope, name: impl Into<String>) -> Scope {
		let name = name.into();
		if let Some(&scope) = self.children.get(&(parent, name.clone())) {
			return scope;
		}
		let scope = self.nodes.push(Node {
			name: name.clone(),
			parent,
		});
		self.children.insert((parent, name), scope);
		scope
	}

	/// Dotted path from the root to `scope`. The root itself is `<root>`.
	pub(crate) fn path(&self, scope: Scope) -> String {
		let mut names = Vec::new();
		let mut cur = scope;
		while cur != self.root {
			names.push(self.nodes[cur].name.as_str());
			cur = self.nodes[cur].parent;
		}
		if names.is_empty() {
			return "<root>".to_string();
		}
		names.reverse();
		names.join(".")
	}
}
