//! Programs, modules and declarations.

use crate::{Expr, MemberRef, SourceLoc, Stmt, Type};

/// A whole resolved program.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub name: String,
    /// Source file name, used in halt positions.
    pub source_file: String,
    /// Modules in dependency order.
    pub modules: Vec<Module>,
    /// The designated entry method, if the program has one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub main: Option<MemberRef>,
}

impl Program {
    /// Name of the module holding declarations outside any explicit module.
    pub const DEFAULT_MODULE: &'static str = "_module";
}

/// A module and everything declared in it.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Module {
    pub name: String,
    pub is_default: bool,
    /// Implemented entirely by an auxiliary target file.
    pub is_extern: bool,
    pub decls: Vec<TopLevelDecl>,
    /// Module-level members, placed in the module's default class.
    pub members: Vec<Member>,
}

impl Module {
    pub fn default_module() -> Self {
        Module {
            name: Program::DEFAULT_MODULE.to_string(),
            is_default: true,
            ..Module::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            ..Module::default()
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopLevelDecl {
    Class(ClassDecl),
    Trait(ClassDecl),
    Datatype(DatatypeDecl),
    Newtype(NewtypeDecl),
    SubsetType(SubsetTypeDecl),
    Iterator(IteratorDecl),
}

impl TopLevelDecl {
    pub fn name(&self) -> &str {
        match self {
            TopLevelDecl::Class(c) | TopLevelDecl::Trait(c) => &c.name,
            TopLevelDecl::Datatype(d) => &d.name,
            TopLevelDecl::Newtype(n) => &n.name,
            TopLevelDecl::SubsetType(s) => &s.name,
            TopLevelDecl::Iterator(i) => &i.name,
        }
    }

    /// Members declared directly on this declaration.
    pub fn members(&self) -> &[Member] {
        match self {
            TopLevelDecl::Class(c) | TopLevelDecl::Trait(c) => &c.members,
            TopLevelDecl::Datatype(d) => &d.members,
            TopLevelDecl::Newtype(n) => &n.members,
            TopLevelDecl::SubsetType(_) | TopLevelDecl::Iterator(_) => &[],
        }
    }

    pub fn type_params(&self) -> &[String] {
        match self {
            TopLevelDecl::Class(c) | TopLevelDecl::Trait(c) => &c.type_params,
            TopLevelDecl::Datatype(d) => &d.type_params,
            TopLevelDecl::SubsetType(s) => &s.type_params,
            TopLevelDecl::Newtype(_) | TopLevelDecl::Iterator(_) => &[],
        }
    }
}

/// A class or trait.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<String>,
    /// Direct supertypes; may include [`Type::Object`].
    pub parents: Vec<Type>,
    pub members: Vec<Member>,
    pub is_extern: bool,
    pub loc: SourceLoc,
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatatypeDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub ctors: Vec<Ctor>,
    pub members: Vec<Member>,
    /// Co-inductive datatype.
    pub is_co: bool,
    pub loc: SourceLoc,
}

impl DatatypeDecl {
    pub fn ctor(&self, name: &str) -> Option<&Ctor> {
        self.ctors.iter().find(|c| c.name == name)
    }
}

/// A datatype constructor with its destructors.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctor {
    pub name: String,
    pub fields: Vec<Formal>,
}

impl Ctor {
    pub fn new(name: impl Into<String>, fields: Vec<Formal>) -> Self {
        Ctor {
            name: name.into(),
            fields,
        }
    }

    pub fn non_ghost_fields(&self) -> impl Iterator<Item = &Formal> {
        self.fields.iter().filter(|f| !f.is_ghost)
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtypeDecl {
    pub name: String,
    pub base: Type,
    pub witness: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetTypeDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<String>,
    pub base: Type,
    pub witness: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IteratorDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

/// A parameter, out-parameter or datatype field.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formal {
    pub name: String,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_ghost: bool,
}

impl Formal {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Formal {
            name: name.into(),
            ty,
            is_ghost: false,
        }
    }

    pub fn ghost(name: impl Into<String>, ty: Type) -> Self {
        Formal {
            is_ghost: true,
            ..Formal::new(name, ty)
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Member {
    Field(Field),
    Method(Method),
    Function(Function),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
            Member::Function(f) => &f.name,
        }
    }

    pub fn is_ghost(&self) -> bool {
        match self {
            Member::Field(f) => f.is_ghost,
            Member::Method(m) => m.is_ghost,
            Member::Function(f) => f.is_ghost,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Field(f) => f.is_static,
            Member::Method(m) => m.is_static,
            Member::Function(f) => f.is_static,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_const: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_ghost: bool,
    /// Initializer of a constant field.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rhs: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

impl Field {
    pub fn var(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            is_static: false,
            is_const: false,
            is_ghost: false,
            rhs: None,
            loc: SourceLoc::SYNTHETIC,
        }
    }

    pub fn constant(name: impl Into<String>, ty: Type, rhs: Option<Expr>) -> Self {
        Field {
            is_const: true,
            rhs,
            ..Field::var(name, ty)
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Method {
    pub name: String,
    pub type_params: Vec<String>,
    pub ins: Vec<Formal>,
    pub outs: Vec<Formal>,
    /// `None` for abstract and extern methods.
    pub body: Option<Vec<Stmt>>,
    pub is_static: bool,
    pub is_ghost: bool,
    pub is_constructor: bool,
    pub is_tail_recursive: bool,
    /// Body to be synthesized by the compiler.
    pub is_synthesized: bool,
    pub loc: SourceLoc,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ins: Vec<Formal>,
    pub result: Type,
    /// `None` for abstract and extern functions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_ghost: bool,
    /// Parameterless function rendered as a property.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_getter: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_tail_recursive: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

impl Function {
    pub fn new(name: impl Into<String>, ins: Vec<Formal>, result: Type, body: Expr) -> Self {
        Function {
            name: name.into(),
            type_params: Vec::new(),
            ins,
            result,
            body: Some(body),
            is_static: false,
            is_ghost: false,
            is_getter: false,
            is_tail_recursive: false,
            loc: SourceLoc::SYNTHETIC,
        }
    }
}
