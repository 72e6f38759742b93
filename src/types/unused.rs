//! Unused-binding lint.
//!
//! Every named variable has to be read at least once. Assignments do not
//! count as reads. Constants are exempt, as are blank identifiers, which never
//! create a binding.

use super::scope::Binding;
use super::validate::ValidationError;

/// Report each variable that was declared but never read, in declaration order.
pub fn unused_bindings(bindings: &[Binding]) -> Vec<ValidationError> {
    bindings
        .iter()
        .filter(|b| !b.used && !b.is_constant() && b.name != "_")
        .map(|b| ValidationError::unused_binding(b.name.clone(), b.position.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use lachs::Span;

    use super::*;
    use crate::types::constant::Constant;
    use crate::types::ty::Type;

    #[test]
    fn reports_unread_variables_only() {
        let mut read = Binding::variable("a", Type::INT, Span::default());
        read.used = true;
        let bindings = vec![
            read,
            Binding::variable("b", Type::INT, Span::default()),
            Binding::constant("c", Constant::Int(1), Type::INT, Span::default()),
        ];

        let names: Vec<_> = unused_bindings(&bindings)
            .into_iter()
            .map(|e| match e {
                ValidationError::UnusedBinding { name, .. } => name,
                other => panic!("unexpected error: {other}"),
            })
            .collect();
        assert_eq!(names, vec!["b"]);
    }
}
