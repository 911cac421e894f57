//! Rust identifiers for remote names.

use convert_case::{Case, Casing};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Names generated types already use for their own plumbing.
pub const RESERVED_MEMBERS: &[&str] = &["bridge", "cast", "from_handle", "handle", "path"];

/// Inherent methods of `SpecializedCollection`; they shadow same-named members
/// of an ops class reached through `Deref`.
pub const COLLECTION_MEMBERS: &[&str] = &[
    "by_key", "get", "is_empty", "items", "iter", "len", "ops", "to_vec",
];

/// Names the generated source imports or relies on from the prelude.
pub const RESERVED_TYPES: &[&str] = &[
    "BridgeError",
    "CallOptions",
    "Collection",
    "EnumSet",
    "ObjectHandle",
    "Option",
    "RemoteEnum",
    "RemoteStruct",
    "Result",
    "SpecializedCollection",
    "String",
];

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_snake(name: &str) -> bool {
    is_identifier(name) && !name.chars().any(|c| c.is_ascii_uppercase())
}

/// Escape a keyword so it can be used as an identifier.
pub fn escape(ident: &str) -> String {
    if NON_RAW.contains(&ident) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Bare snake_case name for a property, method or parameter id.
pub fn member_name(id: &str) -> String {
    if is_snake(id) {
        id.to_string()
    } else {
        id.to_case(Case::Snake)
    }
}

/// Escaped identifier for a member.
pub fn member_ident(id: &str) -> String {
    escape(&member_name(id))
}

pub fn setter_ident(id: &str) -> String {
    format!("set_{}", member_name(id))
}

/// PascalCase variant for an enum token such as `ROTATION_DIFF`.
pub fn variant_ident(token: &str) -> String {
    let pascal = token.to_case(Case::Pascal);
    let pascal: String = pascal.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect();
    match pascal.chars().next() {
        None => "Empty".to_string(),
        Some(c) if c.is_ascii_digit() => format!("N{pascal}"),
        Some(_) => escape(&pascal),
    }
}

/// Name of the generated options struct for `class.method`.
pub fn options_ident(class: &str, method: &str) -> String {
    format!("{class}{}Options", method.to_case(Case::Pascal))
}
