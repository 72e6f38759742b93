use std::fmt;

/// The predeclared basic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,
}

/// Kinds of untyped constants. Numeric kinds are ordered so that mixing two
/// untyped operands yields the larger kind: `int < rune < float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UntypedKind {
    Int,
    Rune,
    Float,
    Bool,
    String,
}

impl UntypedKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, UntypedKind::Int | UntypedKind::Rune | UntypedKind::Float)
    }

    /// The type an untyped value takes when nothing else decides it.
    pub fn default_type(&self) -> Type {
        match self {
            UntypedKind::Int => Type::Basic(BasicKind::Int),
            UntypedKind::Rune => Type::Basic(BasicKind::Int32),
            UntypedKind::Float => Type::Basic(BasicKind::Float64),
            UntypedKind::Bool => Type::Basic(BasicKind::Bool),
            UntypedKind::String => Type::Basic(BasicKind::String),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UntypedKind::Int => "int",
            UntypedKind::Rune => "rune",
            UntypedKind::Float => "float",
            UntypedKind::Bool => "bool",
            UntypedKind::String => "string",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Basic(BasicKind),
    Untyped(UntypedKind),
    /// Result of a call that returns nothing, e.g. `fmt.Println(..)`.
    Void,
    /// Placeholder after an error; suppresses follow-up diagnostics.
    Invalid,
}

impl Type {
    pub const INT: Type = Type::Basic(BasicKind::Int);
    pub const INT32: Type = Type::Basic(BasicKind::Int32);
    pub const FLOAT32: Type = Type::Basic(BasicKind::Float32);
    pub const FLOAT64: Type = Type::Basic(BasicKind::Float64);
    pub const BOOL: Type = Type::Basic(BasicKind::Bool);
    pub const STRING: Type = Type::Basic(BasicKind::String);

    /// Resolve a predeclared type name, including the `byte` and `rune` aliases.
    pub fn from_name(name: &str) -> Option<Type> {
        let kind = match name {
            "int" => BasicKind::Int,
            "int8" => BasicKind::Int8,
            "int16" => BasicKind::Int16,
            "int32" | "rune" => BasicKind::Int32,
            "int64" => BasicKind::Int64,
            "uint" => BasicKind::Uint,
            "uint8" | "byte" => BasicKind::Uint8,
            "uint16" => BasicKind::Uint16,
            "uint32" => BasicKind::Uint32,
            "uint64" => BasicKind::Uint64,
            "float32" => BasicKind::Float32,
            "float64" => BasicKind::Float64,
            "bool" => BasicKind::Bool,
            "string" => BasicKind::String,
            _ => return None,
        };
        Some(Type::Basic(kind))
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Untyped(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Type::Basic(kind) => kind.is_integer(),
            Type::Untyped(kind) => matches!(kind, UntypedKind::Int | UntypedKind::Rune),
            _ => false,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            Type::Basic(BasicKind::Float32 | BasicKind::Float64)
                | Type::Untyped(UntypedKind::Float)
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_bool(&self) -> bool {
        matches!(
            self,
            Type::Basic(BasicKind::Bool) | Type::Untyped(UntypedKind::Bool)
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Type::Basic(BasicKind::String) | Type::Untyped(UntypedKind::String)
        )
    }

    /// Values ordered by `<`, `<=`, `>` and `>=`.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_string()
    }

    /// The type an untyped value defaults to; typed values are unchanged.
    pub fn default_type(&self) -> Type {
        match self {
            Type::Untyped(kind) => kind.default_type(),
            other => *other,
        }
    }

    pub fn basic(&self) -> Option<BasicKind> {
        match self {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl BasicKind {
    pub fn is_integer(&self) -> bool {
        self.int_range().is_some()
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            BasicKind::Uint | BasicKind::Uint8 | BasicKind::Uint16 | BasicKind::Uint32 | BasicKind::Uint64
        )
    }

    /// Width in bits of integer kinds. `int` and `uint` are 64 bits wide.
    pub fn bits(&self) -> Option<u32> {
        match self {
            BasicKind::Int8 | BasicKind::Uint8 => Some(8),
            BasicKind::Int16 | BasicKind::Uint16 => Some(16),
            BasicKind::Int32 | BasicKind::Uint32 => Some(32),
            BasicKind::Int | BasicKind::Int64 | BasicKind::Uint | BasicKind::Uint64 => Some(64),
            _ => None,
        }
    }

    /// Inclusive value range of integer kinds.
    pub fn int_range(&self) -> Option<(i128, i128)> {
        let bits = self.bits()?;
        if self.is_unsigned() {
            Some((0, (1i128 << bits) - 1))
        } else {
            Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Bool => "bool",
            BasicKind::String => "string",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Basic(kind) => f.write_str(kind.name()),
            Type::Untyped(kind) => write!(f, "untyped {}", kind.name()),
            Type::Void => f.write_str("no value"),
            Type::Invalid => f.write_str("invalid type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_their_basic_kind() {
        assert_eq!(Type::from_name("byte"), Some(Type::Basic(BasicKind::Uint8)));
        assert_eq!(Type::from_name("rune"), Some(Type::INT32));
        assert_eq!(Type::from_name("complex128"), None);
    }

    #[test]
    fn integer_ranges() {
        assert_eq!(BasicKind::Uint8.int_range(), Some((0, 255)));
        assert_eq!(BasicKind::Int8.int_range(), Some((-128, 127)));
        assert_eq!(
            BasicKind::Int.int_range(),
            Some((i64::MIN as i128, i64::MAX as i128))
        );
        assert_eq!(BasicKind::Uint64.int_range(), Some((0, u64::MAX as i128)));
        assert_eq!(BasicKind::Float64.int_range(), None);
    }

    #[test]
    fn untyped_kinds_default_and_order() {
        assert!(UntypedKind::Int < UntypedKind::Rune);
        assert!(UntypedKind::Rune < UntypedKind::Float);
        assert_eq!(Type::Untyped(UntypedKind::Rune).default_type(), Type::INT32);
        assert_eq!(Type::Untyped(UntypedKind::Float).to_string(), "untyped float");
    }
}
