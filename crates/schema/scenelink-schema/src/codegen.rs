//! Registry → Rust bindings using the rust-codegen crate.
//!
//! Output is a plain item list (no inner attributes) so it can be pulled in
//! with `include!`. Every generated type wraps an `ObjectHandle`; accessors
//! forward to the runtime's `access` helpers and never touch the bridge
//! directly.

use log::debug;
use rust_codegen::{Field, Function, Impl, Scope, Struct, Type};

use crate::naming;
use crate::registry::{has_setter, Registry};
use crate::types::{ClassSpec, EnumSpec, MethodSpec, PropertySpec, PropertyType};
use crate::{CodegenConfig, CodegenError};

const RUNTIME_IMPORTS: &[&str] = &[
    "access",
    "encode_enum",
    "BridgeError",
    "CallOptions",
    "Collection",
    "EnumSet",
    "ObjectHandle",
    "RemoteEnum",
    "RemoteStruct",
    "SpecializedCollection",
];

fn doc_comment(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                format!("{indent}///\n")
            } else {
                format!("{indent}/// {line}\n")
            }
        })
        .collect()
}

/// Rust type of a value slot (property, parameter or return).
fn value_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::Boolean => "bool".to_string(),
        PropertyType::Integer { .. } => "i32".to_string(),
        PropertyType::Float { .. } => "f32".to_string(),
        PropertyType::String { nullable: false } => "String".to_string(),
        PropertyType::String { nullable: true } => "Option<String>".to_string(),
        PropertyType::Array { item, len } => format!("[{}; {len}]", item.rust_type()),
        PropertyType::Enum { enum_ref } => enum_ref.clone(),
        PropertyType::EnumSet { enum_ref } => format!("EnumSet<{enum_ref}>"),
        PropertyType::Pointer {
            class,
            nullable: false,
        } => class.clone(),
        PropertyType::Pointer {
            class,
            nullable: true,
        } => format!("Option<{class}>"),
        PropertyType::Collection {
            element,
            ops: None,
        } => format!("Collection<{element}>"),
        PropertyType::Collection {
            element,
            ops: Some(ops),
        } => format!("SpecializedCollection<{ops}, {element}>"),
    }
}

/// Argument type of a setter for `ty`.
fn setter_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::String { nullable: false } => "&str".to_string(),
        PropertyType::String { nullable: true } => "Option<&str>".to_string(),
        PropertyType::EnumSet { enum_ref } => format!("&EnumSet<{enum_ref}>"),
        PropertyType::Pointer {
            class,
            nullable: false,
        } => format!("&{class}"),
        PropertyType::Pointer {
            class,
            nullable: true,
        } => format!("Option<&{class}>"),
        other => value_type(other),
    }
}

/// `access` helper suffix shared by the getter and setter of `ty`.
fn accessor_suffix(ty: &PropertyType) -> &'static str {
    match ty {
        PropertyType::Boolean => "bool",
        PropertyType::Integer { .. } => "int",
        PropertyType::Float { .. } => "float",
        PropertyType::String { nullable: false } => "string",
        PropertyType::String { nullable: true } => "string_opt",
        PropertyType::Array { .. } => "array",
        PropertyType::Enum { .. } => "enum",
        PropertyType::EnumSet { .. } => "enum_set",
        PropertyType::Pointer {
            nullable: false, ..
        } => "class",
        PropertyType::Pointer { nullable: true, .. } => "class_opt",
        PropertyType::Collection { .. } => "collection",
    }
}

pub struct Generator {
    config: CodegenConfig,
}

impl Generator {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Validate `registry` and render every enum and class into one source unit.
    pub fn generate(&self, registry: &Registry) -> Result<String, CodegenError> {
        registry.validate()?;

        let mut header = Scope::new();
        if let Some(banner) = &self.config.header {
            header.raw(&format!("// {banner}"));
        }
        header.raw("// Generated by scenelink-schema. Do not edit manually.");
        header.raw("");

        let mut scope = Scope::new();
        for item in RUNTIME_IMPORTS {
            scope.import(&self.config.runtime_crate, item);
        }
        scope.import("std", "fmt");

        for spec in &registry.enums {
            self.push_enum(&mut scope, spec);
        }
        for class in &registry.classes {
            self.push_class(&mut scope, registry, class)?;
        }
        debug!(
            "generated {} enums and {} classes",
            registry.enums.len(),
            registry.classes.len()
        );
        Ok(format!("{}{}", header.to_string(), scope.to_string()))
    }

    /// Items for a single enum, without imports.
    pub fn generate_enum(&self, registry: &Registry, name: &str) -> Result<String, CodegenError> {
        let spec = registry
            .enum_spec(name)
            .ok_or_else(|| CodegenError::UnknownType(name.to_string()))?;
        let mut scope = Scope::new();
        self.push_enum(&mut scope, spec);
        Ok(scope.to_string())
    }

    /// Items for a single class (struct, trait impls, options, accessors),
    /// without imports.
    pub fn generate_class(&self, registry: &Registry, name: &str) -> Result<String, CodegenError> {
        registry.validate()?;
        let class = registry
            .class(name)
            .ok_or_else(|| CodegenError::UnknownType(name.to_string()))?;
        let mut scope = Scope::new();
        self.push_class(&mut scope, registry, class)?;
        Ok(scope.to_string())
    }

    fn push_enum(&self, scope: &mut Scope, spec: &EnumSpec) {
        debug!("generating enum {}", spec.name);
        let name = &spec.name;
        let variants: Vec<(String, &str, &str)> = spec
            .items
            .iter()
            .map(|item| {
                let variant = item
                    .name
                    .clone()
                    .unwrap_or_else(|| naming::variant_ident(&item.id));
                (variant, item.id.as_str(), item.doc.as_str())
            })
            .collect();

        let mut decl = String::new();
        if self.config.emit_docs && !spec.doc.is_empty() {
            decl.push_str(&doc_comment(&spec.doc, ""));
        }
        decl.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]\n");
        decl.push_str(&format!("pub enum {name} {{\n"));
        for (variant, token, doc) in &variants {
            if self.config.emit_docs {
                let text = if doc.is_empty() {
                    format!("`{token}`")
                } else {
                    format!("`{token}`: {doc}")
                };
                decl.push_str(&doc_comment(&text, "    "));
            }
            decl.push_str(&format!("    {variant},\n"));
        }
        decl.push('}');
        scope.raw(&decl);

        let all: Vec<String> = variants.iter().map(|(v, _, _)| format!("Self::{v}")).collect();
        let to_token: String = variants
            .iter()
            .map(|(v, t, _)| format!("            Self::{v} => {t:?},\n"))
            .collect();
        let from_token: String = variants
            .iter()
            .map(|(v, t, _)| format!("            {t:?} => Some(Self::{v}),\n"))
            .collect();
        scope.raw(&format!(
            "impl RemoteEnum for {name} {{\n    const NAME: &'static str = {name:?};\n    const ALL: &'static [Self] = &[{}];\n\n    fn token(&self) -> &'static str {{\n        match self {{\n{to_token}        }}\n    }}\n\n    fn from_token(token: &str) -> Option<Self> {{\n        match token {{\n{from_token}            _ => None,\n        }}\n    }}\n}}",
            all.join(", ")
        ));
        scope.raw(&format!(
            "impl fmt::Display for {name} {{\n    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{\n        f.write_str(self.token())\n    }}\n}}"
        ));
    }

    fn push_class(
        &self,
        scope: &mut Scope,
        registry: &Registry,
        class: &ClassSpec,
    ) -> Result<(), CodegenError> {
        debug!("generating class {}", class.name);
        let name = &class.name;

        let mut decl = String::new();
        if self.config.emit_docs && !class.doc.is_empty() {
            decl.push_str(&doc_comment(&class.doc, ""));
        }
        decl.push_str("#[derive(Clone)]\n");
        decl.push_str(&format!("pub struct {name}(ObjectHandle);"));
        scope.raw(&decl);

        scope.raw(&format!(
            "impl RemoteStruct for {name} {{\n    const TYPE_NAME: &'static str = {name:?};\n\n    fn from_handle(handle: ObjectHandle) -> Self {{\n        Self(handle)\n    }}\n\n    fn handle(&self) -> &ObjectHandle {{\n        &self.0\n    }}\n}}"
        ));
        scope.raw(&format!(
            "impl fmt::Debug for {name} {{\n    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{\n        self.0.fmt_typed(f, Self::TYPE_NAME)\n    }}\n}}"
        ));
        scope.raw(&format!(
            "impl fmt::Display for {name} {{\n    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{\n        fmt::Display::fmt(self.0.path(), f)\n    }}\n}}"
        ));

        let chain = registry.ancestors(class)?;
        for base in chain.iter().skip(1) {
            scope.raw(&format!(
                "impl From<{name}> for {base} {{\n    fn from(value: {name}) -> Self {{\n        {base}::from_handle(value.0)\n    }}\n}}",
                base = base.name
            ));
        }

        for method in class.methods.iter().filter(|m| !m.params.is_empty()) {
            self.push_options(scope, class, method);
        }

        let mut accessors = Impl::new(name.as_str());
        let mut members = 0usize;
        for prop in registry.properties_of(class)? {
            members += self.push_property(&mut accessors, prop);
        }
        // Methods keep the options struct of the class that declares them.
        for owner in chain.iter().rev() {
            for method in &owner.methods {
                self.push_method(&mut accessors, owner, method);
                members += 1;
            }
        }
        if members > 0 {
            scope.push_impl(accessors);
        }
        Ok(())
    }

    fn property_doc(&self, prop: &PropertySpec) -> Option<String> {
        if !self.config.emit_docs {
            return None;
        }
        let mut lines = Vec::new();
        if !prop.doc.is_empty() {
            lines.push(prop.doc.clone());
        }
        if self.config.document_domains {
            let mut notes = Vec::new();
            if let Some(note) = prop.ty.domain_note() {
                notes.push(note);
            }
            if prop.readonly {
                notes.push("Read-only.".to_string());
            }
            if !notes.is_empty() {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(notes.join(" "));
            }
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    /// Getter plus setter when writable; returns the number of functions added.
    fn push_property(&self, accessors: &mut Impl, prop: &PropertySpec) -> usize {
        let id = &prop.id;
        let suffix = accessor_suffix(&prop.ty);
        let doc = self.property_doc(prop);

        let mut getter = Function::new(&naming::member_ident(id));
        if let Some(doc) = &doc {
            getter.doc(doc);
        }
        getter.vis("pub").arg_ref_self();
        match &prop.ty {
            PropertyType::Collection { ops: None, .. } => {
                getter
                    .ret(&value_type(&prop.ty))
                    .line(format!("access::collection(&self.0, {id:?})"));
            }
            PropertyType::Collection { ops: Some(_), .. } => {
                getter
                    .ret(&value_type(&prop.ty))
                    .line(format!("access::specialized_collection(&self.0, {id:?})"));
            }
            _ => {
                getter
                    .ret(&format!("Result<{}, BridgeError>", value_type(&prop.ty)))
                    .line(format!("access::get_{suffix}(&self.0, {id:?})"));
            }
        }
        accessors.push_fn(getter);

        if !has_setter(prop) {
            return 1;
        }
        let mut setter = Function::new(&naming::setter_ident(id));
        if self.config.emit_docs {
            setter.doc(&format!("Write the `{id}` property."));
        }
        setter
            .vis("pub")
            .arg_ref_self()
            .arg("value", setter_type(&prop.ty).as_str())
            .ret("Result<(), BridgeError>")
            .line(format!("access::set_{suffix}(&self.0, {id:?}, value)"));
        accessors.push_fn(setter);
        2
    }

    fn push_options(&self, scope: &mut Scope, class: &ClassSpec, method: &MethodSpec) {
        let ident = naming::options_ident(&class.name, &method.id);
        let mut options = Struct::new(&ident);
        options
            .vis("pub")
            .derive("Clone")
            .derive("Debug")
            .derive("Default");
        if self.config.emit_docs {
            options.doc(&format!(
                "Options for [`{}::{}`]. Unset fields use the remote defaults.",
                class.name,
                naming::member_ident(&method.id)
            ));
        }
        let mut inserts = String::new();
        for param in &method.params {
            let field_ident = naming::member_ident(&param.id);
            let documentation = if self.config.emit_docs && !param.doc.is_empty() {
                vec![param.doc.clone()]
            } else {
                vec![]
            };
            // push_field returns the struct, not the field
            options.push_field(Field {
                name: format!("pub {field_ident}"),
                ty: Type::new(&format!("Option<{}>", param_type(&param.ty))),
                documentation,
                annotation: vec![],
            });
            let encoded = match &param.ty {
                PropertyType::Enum { .. } => format!("options.{field_ident}.map(encode_enum)"),
                PropertyType::EnumSet { .. } => {
                    format!("options.{field_ident}.map(EnumSet::into_value)")
                }
                PropertyType::Pointer { .. } => {
                    format!("options.{field_ident}.map(access::encode_class)")
                }
                _ => format!("options.{field_ident}"),
            };
            inserts.push_str(&format!(
                "        call.insert_opt({:?}, {encoded});\n",
                param.id
            ));
        }
        scope.push_struct(options);
        scope.raw(&format!(
            "impl From<{ident}> for CallOptions {{\n    fn from(options: {ident}) -> Self {{\n        let mut call = CallOptions::new();\n{inserts}        call\n    }}\n}}"
        ));
    }

    fn push_method(&self, accessors: &mut Impl, owner: &ClassSpec, method: &MethodSpec) {
        let id = &method.id;
        let mut function = Function::new(&naming::member_ident(id));
        if self.config.emit_docs && !method.doc.is_empty() {
            function.doc(&method.doc);
        }
        function.vis("pub").arg_ref_self();
        let options = if method.params.is_empty() {
            "CallOptions::new()".to_string()
        } else {
            function.arg(
                "options",
                naming::options_ident(&owner.name, id).as_str(),
            );
            "options.into()".to_string()
        };
        let (ret, helper) = match &method.returns {
            None => ("()".to_string(), "call_void"),
            Some(ty @ PropertyType::Array { .. }) => (value_type(ty), "call_array"),
            Some(ty @ PropertyType::Enum { .. }) => (value_type(ty), "call_enum"),
            Some(ty @ PropertyType::Pointer { .. }) => (value_type(ty), "call_class"),
            Some(ty) => (value_type(ty), "call_value"),
        };
        function
            .ret(&format!("Result<{ret}, BridgeError>"))
            .line(format!("access::{helper}(&self.0, {id:?}, {options})"));
        accessors.push_fn(function);
    }
}

/// Option payload type of a call parameter.
fn param_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::String { .. } => "String".to_string(),
        PropertyType::Pointer { class, .. } => class.clone(),
        other => value_type(other),
    }
}
