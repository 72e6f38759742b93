//! Binding table used while checking.
//!
//! Bindings live in one arena in declaration order; scopes map names to
//! arena indices. The arena outlives the scopes so the unused-binding lint can
//! inspect every binding once checking is done.

use std::collections::HashMap;

use lachs::Span;

use super::constant::Constant;
use super::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    Constant(Constant),
    Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    pub ty: Type,
    pub position: Span,
    /// Set when the binding is read.
    pub used: bool,
}

impl Binding {
    pub fn constant(name: impl Into<String>, value: Constant, ty: Type, position: Span) -> Self {
        Binding {
            name: name.into(),
            kind: BindingKind::Constant(value),
            ty,
            position,
            used: false,
        }
    }

    pub fn variable(name: impl Into<String>, ty: Type, position: Span) -> Self {
        Binding {
            name: name.into(),
            kind: BindingKind::Variable,
            ty,
            position,
            used: false,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, BindingKind::Constant(_))
    }
}

pub type BindingId = usize;

#[derive(Debug, Default)]
pub struct Scopes {
    frames: Vec<HashMap<String, BindingId>>,
    bindings: Vec<Binding>,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            frames: vec![HashMap::new()],
            bindings: vec![],
        }
    }

    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Add a binding to the innermost scope. Fails with the existing binding
    /// when the name is already declared there.
    pub fn declare(&mut self, binding: Binding) -> Result<BindingId, BindingId> {
        if let Some(existing) = self.lookup_local(&binding.name) {
            return Err(existing);
        }
        let id = self.bindings.len();
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(binding.name.clone(), id);
        }
        self.bindings.push(binding);
        Ok(id)
    }

    /// Resolve a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<BindingId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// Resolve a name in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<BindingId> {
        self.frames.last().and_then(|frame| frame.get(name).copied())
    }

    pub fn get(&self, id: BindingId) -> &Binding {
        &self.bindings[id]
    }

    pub fn mark_used(&mut self, id: BindingId) {
        if let Some(binding) = self.bindings.get_mut(id) {
            binding.used = true;
        }
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scopes_shadow_outer_ones() {
        let mut scopes = Scopes::new();
        let outer = scopes
            .declare(Binding::variable("x", Type::INT, Span::default()))
            .unwrap();
        scopes.enter();
        let inner = scopes
            .declare(Binding::variable("x", Type::STRING, Span::default()))
            .unwrap();
        assert_eq!(scopes.lookup("x"), Some(inner));
        scopes.leave();
        assert_eq!(scopes.lookup("x"), Some(outer));
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut scopes = Scopes::new();
        let first = scopes
            .declare(Binding::variable("x", Type::INT, Span::default()))
            .unwrap();
        let second = scopes.declare(Binding::variable("x", Type::INT, Span::default()));
        assert_eq!(second, Err(first));
    }

    #[test]
    fn bindings_outlive_their_scope() {
        let mut scopes = Scopes::new();
        scopes.enter();
        scopes
            .declare(Binding::variable("i", Type::INT, Span::default()))
            .unwrap();
        scopes.leave();
        let bindings = scopes.into_bindings();
        assert_eq!(bindings.len(), 1);
        assert!(!bindings[0].used);
    }
}
