//! scenelink-schema: declarative description of remote host types and the
//! generator that renders typed bindings for them.
//!
//! A [`Registry`] is loaded from JSON, merged across files and validated;
//! [`Generator`] then turns it into Rust source for `scenelink-bridge-core`.

pub mod codegen;
pub mod config;
pub mod error;
pub mod naming;
pub mod registry;
pub mod types;

pub use codegen::Generator;
pub use config::CodegenConfig;
pub use error::{CodegenError, SchemaError};
pub use registry::Registry;
pub use types::{
    ArrayItemType, ClassSpec, EnumItem, EnumSpec, MethodSpec, ParamSpec, PropertySpec,
    PropertyType,
};
