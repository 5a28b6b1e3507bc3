//! Resolved types.
//!
//! Types arrive fully resolved: every user-defined reference names its
//! declaration by path, and type arguments are explicit.

use std::fmt;

/// Path to a top-level declaration: owning module plus declaration name.
///
/// Module-level members live in a synthesized class named
/// [`DeclPath::DEFAULT_CLASS`].
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclPath {
    pub module: String,
    pub name: String,
}

impl DeclPath {
    /// Name of the class that holds a module's top-level members.
    pub const DEFAULT_CLASS: &'static str = "__default";

    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        DeclPath {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Path of the default class of `module`.
    pub fn default_class(module: impl Into<String>) -> Self {
        DeclPath::new(module, Self::DEFAULT_CLASS)
    }

    pub fn is_default_class(&self) -> bool {
        self.name == Self::DEFAULT_CLASS
    }
}

impl fmt::Debug for DeclPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// A resolved type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Bool,
    Char,
    /// Arbitrary-precision integer.
    Int,
    /// Arbitrary-precision rational.
    Real,
    /// Unsigned bit-vector of the given width.
    Bitvector(u32),
    /// The universal (nullable) reference type.
    Object,
    /// Class, trait, datatype, newtype or subset type, with actual type arguments.
    UserDefined { decl: DeclPath, args: Vec<Type> },
    Set(Box<Type>),
    Seq(Box<Type>),
    MultiSet(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Arrow { params: Vec<Type>, result: Box<Type> },
    TypeParam(String),
    Tuple(Vec<Type>),
    Array { dims: u32, elem: Box<Type> },
}

impl Type {
    /// Shorthand for a user-defined type without type arguments.
    pub fn user(module: impl Into<String>, name: impl Into<String>) -> Type {
        Type::UserDefined {
            decl: DeclPath::new(module, name),
            args: Vec::new(),
        }
    }

    pub fn seq(elem: Type) -> Type {
        Type::Seq(Box::new(elem))
    }

    pub fn set(elem: Type) -> Type {
        Type::Set(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    /// The type of string literals: a sequence of characters.
    pub fn string() -> Type {
        Type::seq(Type::Char)
    }

    /// Width of a bit-vector type, if this is one.
    pub fn bitvector_width(&self) -> Option<u32> {
        match self {
            Type::Bitvector(w) => Some(*w),
            _ => None,
        }
    }

    pub fn is_char(&self) -> bool {
        matches!(self, Type::Char)
    }

    /// Declaration path of a user-defined type.
    pub fn decl_path(&self) -> Option<&DeclPath> {
        match self {
            Type::UserDefined { decl, .. } => Some(decl),
            _ => None,
        }
    }

    /// Element type of a set, sequence, multiset or array.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Set(t) | Type::Seq(t) | Type::MultiSet(t) => Some(t),
            Type::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Replace type parameters by the matching actual arguments.
    ///
    /// `params` and `args` are parallel; parameters without a matching
    /// argument are left untouched.
    #[must_use]
    pub fn substitute(&self, params: &[String], args: &[Type]) -> Type {
        if params.is_empty() {
            return self.clone();
        }
        let sub = |t: &Type| t.substitute(params, args);
        match self {
            Type::TypeParam(name) => params
                .iter()
                .position(|p| p == name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Type::UserDefined { decl, args: inner } => Type::UserDefined {
                decl: decl.clone(),
                args: inner.iter().map(sub).collect(),
            },
            Type::Set(t) => Type::Set(Box::new(sub(t))),
            Type::Seq(t) => Type::Seq(Box::new(sub(t))),
            Type::MultiSet(t) => Type::MultiSet(Box::new(sub(t))),
            Type::Map(k, v) => Type::Map(Box::new(sub(k)), Box::new(sub(v))),
            Type::Arrow { params: ps, result } => Type::Arrow {
                params: ps.iter().map(sub).collect(),
                result: Box::new(sub(result)),
            },
            Type::Tuple(ts) => Type::Tuple(ts.iter().map(sub).collect()),
            Type::Array { dims, elem } => Type::Array {
                dims: *dims,
                elem: Box::new(sub(elem)),
            },
            Type::Bool
            | Type::Char
            | Type::Int
            | Type::Real
            | Type::Bitvector(_)
            | Type::Object => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn substitute_replaces_nested_params() {
        let t = Type::map(Type::TypeParam("K".into()), Type::seq(Type::TypeParam("V".into())));
        let got = t.substitute(&["K".into(), "V".into()], &[Type::Int, Type::Bool]);
        assert_eq!(got, Type::map(Type::Int, Type::seq(Type::Bool)));
    }

    #[test]
    fn substitute_keeps_unmatched_params() {
        let t = Type::TypeParam("T".into());
        assert_eq!(t.substitute(&["U".into()], &[Type::Int]), t);
    }

    #[test]
    fn default_class_path() {
        let p = DeclPath::default_class("M");
        assert!(p.is_default_class());
        assert_eq!(format!("{p:?}"), "M.__default");
    }
}
