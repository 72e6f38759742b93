use std::collections::HashSet;
use std::fmt;

use lachs::Span;
use tracing::debug;

use super::builtin::{all_packages, package_for_path};
use super::check::{Checker, TypeInfo};
use super::error::TypeError;
use super::unused::unused_bindings;
use crate::ast::Program;

/// Validation errors - program-level semantic checks
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A file with a package clause has no `func main()`
    MissingMain { span: Span },
    /// The package clause names something other than `main`
    NotMainPackage { name: String, span: Span },
    /// Import path that does not name a known package
    UnknownImport { path: String, span: Span },
    DuplicateImport { path: String, span: Span },
    UnusedImport { path: String, span: Span },
    /// A variable or constant that is never read
    UnusedBinding { name: String, span: Span },
    /// Type error from checking the body
    TypeError(TypeError),
}

impl ValidationError {
    pub fn missing_main(span: Span) -> Self {
        ValidationError::MissingMain { span }
    }

    pub fn unused_binding(name: String, span: Span) -> Self {
        ValidationError::UnusedBinding { name, span }
    }

    fn span(&self) -> Option<&Span> {
        match self {
            ValidationError::MissingMain { span }
            | ValidationError::NotMainPackage { span, .. }
            | ValidationError::UnknownImport { span, .. }
            | ValidationError::DuplicateImport { span, .. }
            | ValidationError::UnusedImport { span, .. }
            | ValidationError::UnusedBinding { span, .. } => Some(span),
            ValidationError::TypeError(_) => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            ValidationError::MissingMain { .. } => {
                "function main is undeclared in the main package".to_string()
            }
            ValidationError::NotMainPackage { name, .. } => {
                format!("package {} is not a main package", name)
            }
            ValidationError::UnknownImport { path, .. } => {
                format!("package {} is not in std", path)
            }
            ValidationError::DuplicateImport { path, .. } => {
                format!("{} redeclared in this block", path)
            }
            ValidationError::UnusedImport { path, .. } => {
                format!("{:?} imported and not used", path)
            }
            ValidationError::UnusedBinding { name, .. } => {
                format!("{} declared but not used", name)
            }
            ValidationError::TypeError(err) => return write!(f, "{}", err),
        };

        match self.span() {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&msg)),
            _ => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<TypeError> for ValidationError {
    fn from(err: TypeError) -> Self {
        ValidationError::TypeError(err)
    }
}

/// Validate and type check a program
///
/// This performs:
/// 1. Structural validation (package clause, `func main`, imports)
/// 2. Type checking of the body
/// 3. The unused-binding and unused-import lints
///
/// Every error found is reported; the typed program is only returned when
/// there are none.
pub fn validate_and_type_check(
    program: Program<()>,
) -> Result<Program<TypeInfo>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Step 1: structure of the file
    if let Some(package) = &program.package {
        if package.value != "main" {
            errors.push(ValidationError::NotMainPackage {
                name: package.value.clone(),
                span: package.position.clone(),
            });
        }
        if program.main.is_none() {
            errors.push(ValidationError::missing_main(package.position.clone()));
        }
    }

    let mut seen = HashSet::new();
    let mut imported = vec![];
    for import in &program.imports {
        if !seen.insert(import.path.as_str()) {
            errors.push(ValidationError::DuplicateImport {
                path: import.path.clone(),
                span: import.position.clone(),
            });
            continue;
        }
        match package_for_path(&import.path) {
            Some(name) => imported.push((name, import)),
            None => errors.push(ValidationError::UnknownImport {
                path: import.path.clone(),
                span: import.position.clone(),
            }),
        }
    }

    // Scripts may use every package without importing it.
    let available: Vec<&str> = if program.is_script() && program.imports.is_empty() {
        all_packages().collect()
    } else {
        imported.iter().map(|(name, _)| *name).collect()
    };

    // Step 2: type check the body
    let output = Checker::new(available).check_body(program.body);
    debug!(
        type_errors = output.errors.len(),
        bindings = output.bindings.len(),
        "checked program body"
    );
    errors.extend(output.errors.into_iter().map(ValidationError::from));

    // Step 3: lints
    for (name, import) in &imported {
        if !output.used_packages.iter().any(|used| used == name) {
            errors.push(ValidationError::UnusedImport {
                path: import.path.clone(),
                span: import.position.clone(),
            });
        }
    }
    errors.extend(unused_bindings(&output.bindings));

    if errors.is_empty() {
        Ok(Program {
            package: program.package,
            imports: program.imports,
            main: program.main,
            body: output.body,
        })
    } else {
        Err(errors)
    }
}
