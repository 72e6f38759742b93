use std::collections::HashMap;

use super::value::RValue;

type ScopeFrame = HashMap<String, RValue>;

/// Manages lexical scoping during interpretation
pub struct Scope {
    frames: Vec<ScopeFrame>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// Create a scope holding the single frame of the program body
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Enter a new scope frame
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Leave the current scope frame
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolve a name by searching from innermost to outermost scope
    pub fn resolve(&self, name: &str) -> Option<&RValue> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Add a binding to the current (innermost) scope, shadowing outer ones
    pub fn add(&mut self, name: impl ToString, value: RValue) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        }
    }

    /// Overwrite the innermost existing binding of `name`.
    ///
    /// Returns `false` when the name is not bound anywhere.
    pub fn assign(&mut self, name: &str, value: RValue) -> bool {
        match self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BasicKind;

    fn int(value: i128) -> RValue {
        RValue::Int(value, BasicKind::Int)
    }

    #[test]
    fn inner_frames_shadow_and_unwind() {
        let mut scope = Scope::new();
        scope.add("x", int(1));
        scope.enter();
        scope.add("x", int(2));
        assert_eq!(scope.resolve("x"), Some(&int(2)));
        scope.leave();
        assert_eq!(scope.resolve("x"), Some(&int(1)));
    }

    #[test]
    fn assign_updates_the_outer_binding() {
        let mut scope = Scope::new();
        scope.add("i", int(0));
        scope.enter();
        assert!(scope.assign("i", int(5)));
        scope.leave();
        assert_eq!(scope.resolve("i"), Some(&int(5)));
        assert!(!scope.assign("missing", int(1)));
    }

    #[test]
    fn the_outermost_frame_is_never_popped() {
        let mut scope = Scope::new();
        scope.add("x", int(1));
        scope.leave();
        assert_eq!(scope.resolve("x"), Some(&int(1)));
    }
}
