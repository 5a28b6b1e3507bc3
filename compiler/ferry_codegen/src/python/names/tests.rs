use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn reserved_words_get_a_suffix() {
    assert_eq!(sanitize("class"), "class_");
    assert_eq!(sanitize("None"), "None_");
    assert_eq!(sanitize("self"), "self_");
    assert_eq!(sanitize("len"), "len_");
}

#[test]
fn leading_underscores_move_to_the_end() {
    assert_eq!(sanitize("_x"), "x_");
    assert_eq!(sanitize("__default"), "default__");
    assert_eq!(sanitize("_module"), "module_");
}

#[test]
fn leading_digits_get_a_marker() {
    assert_eq!(sanitize("1x"), "_1x");
    assert_eq!(sanitize("_1x"), "_1x");
    assert_eq!(sanitize("__1x"), "_1x__");
}

#[test]
fn plain_names_are_unchanged() {
    assert_eq!(sanitize("Pair"), "Pair");
    assert_eq!(sanitize("x_y"), "x_y");
}

#[test]
fn all_underscores_are_kept() {
    assert_eq!(sanitize("_"), "_");
    assert_eq!(sanitize("___"), "___");
}

#[test]
fn qualified_names() {
    let path = DeclPath::new("_module", "Pair");
    assert_eq!(decl_name(&path), "module_.Pair");
    assert_eq!(ctor_class_ref(&path, "Make"), "module_.Pair_Make");
    assert_eq!(decl_name(&DeclPath::default_class("A.B")), "A_B.default__");
}

fn identifier() -> impl Strategy<Value = String> {
    "[_a-zA-Z0-9]{1,12}"
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(name in identifier()) {
        let once = sanitize(&name);
        prop_assert_eq!(sanitize(&once), once.clone(), "input {}", name);
    }

    #[test]
    fn sanitize_never_yields_a_generated_name(name in identifier()) {
        let out = sanitize(&name);
        let mut chars = out.chars();
        let generated = chars.next() == Some('_') && chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        prop_assert!(!generated, "{} became {}", name, out);
    }

    #[test]
    fn sanitize_is_injective_on_plain_names(a in "[a-zA-Z0-9][_a-zA-Z0-9]{0,8}", b in "[a-zA-Z0-9][_a-zA-Z0-9]{0,8}") {
        prop_assume!(a != b && !is_reserved(&a) && !is_reserved(&b));
        prop_assert_ne!(sanitize(&a), sanitize(&b));
    }

    #[test]
    fn sanitize_yields_legal_identifiers(name in identifier()) {
        let out = sanitize(&name);
        prop_assert!(!out.starts_with(|c: char| c.is_ascii_digit()));
        prop_assert!(!is_reserved(&out));
    }
}
