//! Schema model of remote host types.
//!
//! Declared domains (ranges, enum items, array lengths, nullability,
//! read-only) are carried into generated documentation only; nothing here
//! or in the generated code enforces them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayItemType {
    Boolean,
    Integer,
    Float,
}

impl ArrayItemType {
    pub fn rust_type(&self) -> &'static str {
        match self {
            ArrayItemType::Boolean => "bool",
            ArrayItemType::Integer => "i32",
            ArrayItemType::Float => "f32",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyType {
    Boolean,
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    String {
        #[serde(default)]
        nullable: bool,
    },
    Array {
        item: ArrayItemType,
        len: usize,
    },
    Enum {
        enum_ref: String,
    },
    EnumSet {
        enum_ref: String,
    },
    Pointer {
        class: String,
        #[serde(default)]
        nullable: bool,
    },
    Collection {
        element: String,
        /// Remote type carrying collection-level operations, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ops: Option<String>,
    },
}

impl PropertyType {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Boolean => "boolean",
            PropertyType::Integer { .. } => "integer",
            PropertyType::Float { .. } => "float",
            PropertyType::String { .. } => "string",
            PropertyType::Array { .. } => "array",
            PropertyType::Enum { .. } => "enum",
            PropertyType::EnumSet { .. } => "enum_set",
            PropertyType::Pointer { .. } => "pointer",
            PropertyType::Collection { .. } => "collection",
        }
    }

    /// Human-readable domain note for docs, e.g. "Range: [1, 1000]".
    pub fn domain_note(&self) -> Option<String> {
        match self {
            PropertyType::Integer { min, max } => range_note(*min, *max),
            PropertyType::Float { min, max } => range_note(*min, *max),
            PropertyType::String { nullable: true } => Some("Nullable.".to_string()),
            PropertyType::Array { item, len } => {
                Some(format!("Array of {len} {}.", item.rust_type()))
            }
            PropertyType::Enum { enum_ref } => Some(format!("One of [`{enum_ref}`].")),
            PropertyType::EnumSet { enum_ref } => Some(format!("Set of [`{enum_ref}`] flags.")),
            PropertyType::Pointer {
                class,
                nullable: true,
            } => Some(format!("Nullable reference to [`{class}`].")),
            _ => None,
        }
    }
}

fn range_note<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> Option<String> {
    match (min, max) {
        (None, None) => None,
        (Some(min), Some(max)) => Some(format!("Range: [{min}, {max}].")),
        (Some(min), None) => Some(format!("Range: [{min}, inf].")),
        (None, Some(max)) => Some(format!("Range: [-inf, {max}].")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumItem {
    /// Wire token, e.g. "VERTICES".
    pub id: String,
    /// Rust variant name; derived from `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSpec {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    pub items: Vec<EnumItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Remote attribute name.
    pub id: String,
    pub ty: PropertyType,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub id: String,
    pub ty: PropertyType,
    #[serde(default)]
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Remote function name.
    pub id: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    /// `None` for void functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<PropertyType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    /// Remote type name; also the generated Rust type name.
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}
