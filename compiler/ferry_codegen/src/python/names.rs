//! Identifier sanitizing.
//!
//! Generated names are `_` followed by a letter (see
//! [`CodegenContext::fresh_name`](crate::CodegenContext::fresh_name)); user
//! names are rewritten so they never take that shape.

use ferry_ir::DeclPath;

/// Python keywords, plus builtins the generated code relies on.
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "self", "sys", "floor", "len", "range", "isinstance",
    "int", "str", "chr", "ord", "set", "super", "object", "Any", "Callable", "TypeVar",
    "NamedTuple",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Map a source identifier to a Python identifier.
///
/// Reserved words get a trailing `_`. Leading underscores move to the end
/// (`__x` becomes `x__`), and a leading digit is prefixed with `_`. Names of
/// the form `_<digit>...` are already in final form and are kept.
pub fn sanitize(name: &str) -> String {
    if is_reserved(name) {
        return format!("{name}_");
    }
    let mut chars = name.chars();
    if chars.next() == Some('_') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return name.to_string();
    }
    let trimmed = name.trim_start_matches('_');
    if trimmed.is_empty() {
        return name.to_string();
    }
    let moved = name.len() - trimmed.len();
    let mut out = String::with_capacity(name.len() + 1);
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    out.push_str(trimmed);
    out.extend(std::iter::repeat('_').take(moved));
    out
}

/// Python module (and file stem) for a source module.
pub fn module_name(module: &str) -> String {
    sanitize(&module.replace('.', "_"))
}

/// Module-qualified reference to a top-level declaration.
pub fn decl_name(path: &DeclPath) -> String {
    format!("{}.{}", module_name(&path.module), sanitize(&path.name))
}

/// Class name of a datatype constructor, unqualified.
pub fn ctor_class(datatype: &str, ctor: &str) -> String {
    format!("{}_{}", sanitize(datatype), sanitize(ctor))
}

/// Module-qualified reference to a datatype constructor class.
pub fn ctor_class_ref(datatype: &DeclPath, ctor: &str) -> String {
    format!("{}.{}", module_name(&datatype.module), ctor_class(&datatype.name, ctor))
}

#[cfg(test)]
mod tests;
