use super::ty::Type;

/// Importable packages: import path and the name code refers to them by.
const PACKAGES: &[(&str, &str)] = &[("fmt", "fmt"), ("math/rand", "rand")];

/// The package name for a known import path.
pub fn package_for_path(path: &str) -> Option<&'static str> {
    PACKAGES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, name)| *name)
}

/// Every package name, for programs that do not import explicitly.
pub fn all_packages() -> impl Iterator<Item = &'static str> {
    PACKAGES.iter().map(|(_, name)| *name)
}

/// Package functions that programs can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `fmt.Println(a ...any)`
    Println,
    /// `rand.Int() int`
    RandInt,
}

impl Builtin {
    pub fn lookup(package: &str, name: &str) -> Option<Builtin> {
        match (package, name) {
            ("fmt", "Println") => Some(Builtin::Println),
            ("rand", "Int") => Some(Builtin::RandInt),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Println => "fmt.Println",
            Builtin::RandInt => "rand.Int",
        }
    }

    /// Number of parameters; `None` for variadic functions.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Builtin::Println => None,
            Builtin::RandInt => Some(0),
        }
    }

    pub fn result(&self) -> Type {
        match self {
            Builtin::Println => Type::Void,
            Builtin::RandInt => Type::INT,
        }
    }
}
