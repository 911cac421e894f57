use std::path::Path;

use hashbrown::{HashMap, HashSet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::naming::{self, COLLECTION_MEMBERS, RESERVED_MEMBERS};
use crate::types::{ClassSpec, EnumSpec, MethodSpec, PropertySpec, PropertyType};
use crate::SchemaError;

/// All remote enums and classes bindings are generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub enums: Vec<EnumSpec>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

impl Registry {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("loaded schema {}", path.display());
        Self::from_json(&text)
    }

    /// Append `other`'s declarations. Duplicates are left for [`Registry::validate`].
    pub fn merge(&mut self, other: Registry) {
        if self.version.is_empty() {
            self.version = other.version;
        }
        self.enums.extend(other.enums);
        self.classes.extend(other.classes);
    }

    pub fn class(&self, name: &str) -> Option<&ClassSpec> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn enum_spec(&self, name: &str) -> Option<&EnumSpec> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// `class` followed by its bases, nearest first.
    pub fn ancestors<'a>(&'a self, class: &'a ClassSpec) -> Result<Vec<&'a ClassSpec>, SchemaError> {
        let mut chain = vec![class];
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(class.name.as_str());
        let mut current = class;
        while let Some(base) = current.base.as_deref() {
            if !seen.insert(base) {
                return Err(SchemaError::BaseCycle {
                    name: class.name.clone(),
                });
            }
            current = self.class(base).ok_or_else(|| SchemaError::UnknownClass {
                owner: current.name.clone(),
                name: base.to_string(),
            })?;
            chain.push(current);
        }
        Ok(chain)
    }

    /// Own and inherited properties, base first.
    pub fn properties_of<'a>(
        &'a self,
        class: &'a ClassSpec,
    ) -> Result<Vec<&'a PropertySpec>, SchemaError> {
        let chain = self.ancestors(class)?;
        Ok(chain
            .iter()
            .rev()
            .flat_map(|c| c.properties.iter())
            .collect())
    }

    /// Own and inherited methods, base first.
    pub fn methods_of<'a>(
        &'a self,
        class: &'a ClassSpec,
    ) -> Result<Vec<&'a MethodSpec>, SchemaError> {
        let chain = self.ancestors(class)?;
        Ok(chain.iter().rev().flat_map(|c| c.methods.iter()).collect())
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut type_names: HashSet<&str> = HashSet::new();
        for name in self
            .enums
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.classes.iter().map(|c| c.name.as_str()))
        {
            if !naming::is_identifier(name)
                || naming::escape(name) != name
                || naming::RESERVED_TYPES.contains(&name)
            {
                return Err(SchemaError::InvalidName {
                    name: name.to_string(),
                });
            }
            if !type_names.insert(name) {
                return Err(SchemaError::DuplicateType {
                    name: name.to_string(),
                });
            }
        }

        for spec in &self.enums {
            self.validate_enum(spec)?;
        }

        let ops_classes: HashSet<&str> = self
            .classes
            .iter()
            .flat_map(|c| &c.properties)
            .filter_map(|prop| match &prop.ty {
                PropertyType::Collection { ops: Some(ops), .. } => Some(ops.as_str()),
                _ => None,
            })
            .collect();

        let mut option_structs: HashMap<String, String> = HashMap::new();
        for class in &self.classes {
            self.ancestors(class)?;
            for prop in &class.properties {
                let owner = format!("{}.{}", class.name, prop.id);
                self.validate_type(&owner, &prop.ty)?;
            }
            for method in &class.methods {
                self.validate_method(class, method)?;
                if !method.params.is_empty() {
                    let ident = naming::options_ident(&class.name, &method.id);
                    let owner = format!("{}.{}", class.name, method.id);
                    if type_names.contains(ident.as_str()) {
                        return Err(SchemaError::NameCollision { owner, name: ident });
                    }
                    if let Some(previous) = option_structs.insert(ident.clone(), owner.clone()) {
                        return Err(SchemaError::NameCollision {
                            owner: previous,
                            name: ident,
                        });
                    }
                }
            }
            self.validate_members(class, ops_classes.contains(class.name.as_str()))?;
        }
        Ok(())
    }

    fn validate_enum(&self, spec: &EnumSpec) -> Result<(), SchemaError> {
        if spec.items.is_empty() {
            return Err(SchemaError::EmptyEnum {
                name: spec.name.clone(),
            });
        }
        let mut tokens = HashSet::new();
        let mut variants = HashSet::new();
        for item in &spec.items {
            if !tokens.insert(item.id.as_str()) {
                return Err(SchemaError::DuplicateItem {
                    enum_name: spec.name.clone(),
                    item: item.id.clone(),
                });
            }
            if let Some(name) = &item.name {
                if !naming::is_identifier(name) || naming::escape(name) != *name {
                    return Err(SchemaError::InvalidName { name: name.clone() });
                }
            }
            let variant = item
                .name
                .clone()
                .unwrap_or_else(|| naming::variant_ident(&item.id));
            if !variants.insert(variant.clone()) {
                return Err(SchemaError::NameCollision {
                    owner: spec.name.clone(),
                    name: variant,
                });
            }
        }
        Ok(())
    }

    fn validate_type(&self, owner: &str, ty: &PropertyType) -> Result<(), SchemaError> {
        let unknown_class = |name: &str| SchemaError::UnknownClass {
            owner: owner.to_string(),
            name: name.to_string(),
        };
        match ty {
            PropertyType::Integer {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(SchemaError::InvalidRange {
                owner: owner.to_string(),
            }),
            PropertyType::Float {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(SchemaError::InvalidRange {
                owner: owner.to_string(),
            }),
            PropertyType::Array { len: 0, .. } => Err(SchemaError::EmptyArray {
                owner: owner.to_string(),
            }),
            PropertyType::Enum { enum_ref } | PropertyType::EnumSet { enum_ref } => {
                match self.enum_spec(enum_ref) {
                    Some(_) => Ok(()),
                    None => Err(SchemaError::UnknownEnum {
                        owner: owner.to_string(),
                        name: enum_ref.clone(),
                    }),
                }
            }
            PropertyType::Pointer { class, .. } => match self.class(class) {
                Some(_) => Ok(()),
                None => Err(unknown_class(class)),
            },
            PropertyType::Collection { element, ops } => {
                if self.class(element).is_none() {
                    return Err(unknown_class(element));
                }
                match ops {
                    Some(ops) if self.class(ops).is_none() => Err(unknown_class(ops)),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn validate_method(&self, class: &ClassSpec, method: &MethodSpec) -> Result<(), SchemaError> {
        let owner = format!("{}.{}", class.name, method.id);
        let mut params = HashSet::new();
        for param in &method.params {
            if matches!(param.ty, PropertyType::Collection { .. }) {
                return Err(SchemaError::UnsupportedParam {
                    owner,
                    kind: param.ty.label(),
                });
            }
            if !params.insert(naming::member_name(&param.id)) {
                return Err(SchemaError::NameCollision {
                    owner,
                    name: param.id.clone(),
                });
            }
            self.validate_type(&format!("{owner}({})", param.id), &param.ty)?;
        }
        if let Some(ret) = &method.returns {
            let supported = match ret {
                PropertyType::EnumSet { .. } | PropertyType::Collection { .. } => false,
                PropertyType::Pointer { nullable, .. } => !nullable,
                _ => true,
            };
            if !supported {
                return Err(SchemaError::UnsupportedReturn {
                    owner,
                    kind: ret.label(),
                });
            }
            self.validate_type(&owner, ret)?;
        }
        Ok(())
    }

    /// Every generated member name of `class`, own and inherited, must be unique.
    fn validate_members(&self, class: &ClassSpec, is_ops: bool) -> Result<(), SchemaError> {
        let mut names: HashSet<String> = RESERVED_MEMBERS.iter().map(|s| s.to_string()).collect();
        if is_ops {
            names.extend(COLLECTION_MEMBERS.iter().map(|s| s.to_string()));
        }
        let mut claim = |name: String| {
            if names.insert(name.clone()) {
                Ok(())
            } else {
                Err(SchemaError::NameCollision {
                    owner: class.name.clone(),
                    name,
                })
            }
        };
        for prop in self.properties_of(class)? {
            claim(naming::member_name(&prop.id))?;
            if has_setter(prop) {
                claim(naming::setter_ident(&prop.id))?;
            }
        }
        for method in self.methods_of(class)? {
            claim(naming::member_name(&method.id))?;
        }
        Ok(())
    }
}

/// Writable, non-collection properties get a `set_<id>` accessor.
pub fn has_setter(prop: &PropertySpec) -> bool {
    !prop.readonly && !matches!(prop.ty, PropertyType::Collection { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(json: &str) -> Registry {
        Registry::from_json(json).unwrap()
    }

    const BASE: &str = r#"{
        "version": "1",
        "enums": [
            { "name": "Mode", "items": [ { "id": "FAST" }, { "id": "SLOW" } ] }
        ],
        "classes": [
            { "name": "Base", "properties": [
                { "id": "name", "ty": { "kind": "string" } }
            ] },
            { "name": "Child", "base": "Base", "properties": [
                { "id": "mode", "ty": { "kind": "enum", "enum_ref": "Mode" } }
            ], "methods": [
                { "id": "reset" }
            ] }
        ]
    }"#;

    #[test]
    fn inherited_members_base_first() {
        let reg = registry(BASE);
        reg.validate().unwrap();
        let child = reg.class("Child").unwrap();
        let ids: Vec<_> = reg
            .properties_of(child)
            .unwrap()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["name", "mode"]);
        assert_eq!(reg.methods_of(child).unwrap().len(), 1);
        let chain: Vec<_> = reg
            .ancestors(child)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(chain, vec!["Child", "Base"]);
    }

    #[test]
    fn merge_then_duplicate_is_rejected() {
        let mut reg = registry(BASE);
        reg.merge(registry(BASE));
        assert_eq!(reg.classes.len(), 4);
        assert!(matches!(
            reg.validate(),
            Err(SchemaError::DuplicateType { .. })
        ));
    }

    #[test]
    fn unresolved_references() {
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "m", "ty": { "kind": "enum", "enum_ref": "Missing" } } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::UnknownEnum { .. })));

        let reg = registry(r#"{ "classes": [ { "name": "A", "base": "Nope" } ] }"#);
        assert!(matches!(reg.validate(), Err(SchemaError::UnknownClass { .. })));
    }

    #[test]
    fn base_cycle() {
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "base": "B" }, { "name": "B", "base": "A" } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::BaseCycle { .. })));
    }

    #[test]
    fn domain_sanity() {
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "x", "ty": { "kind": "float", "min": 2.0, "max": 1.0 } } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::InvalidRange { .. })));

        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "v", "ty": { "kind": "array", "item": "float", "len": 0 } } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::EmptyArray { .. })));
    }

    #[test]
    fn unsupported_signatures() {
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "methods": [
                { "id": "f", "returns": { "kind": "pointer", "class": "A", "nullable": true } } ] } ] }"#,
        );
        assert!(matches!(
            reg.validate(),
            Err(SchemaError::UnsupportedReturn { .. })
        ));

        let reg = registry(
            r#"{ "classes": [ { "name": "A", "methods": [
                { "id": "f", "params": [ { "id": "xs", "ty": { "kind": "collection", "element": "A" } } ] } ] } ] }"#,
        );
        assert!(matches!(
            reg.validate(),
            Err(SchemaError::UnsupportedParam { .. })
        ));
    }

    #[test]
    fn generated_name_collisions() {
        // property `set_name` clashes with the setter of `name`
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "name", "ty": { "kind": "string" } },
                { "id": "set_name", "ty": { "kind": "boolean" } } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::NameCollision { .. })));

        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "path", "ty": { "kind": "string" } } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::NameCollision { .. })));

        let reg = registry(
            r#"{ "enums": [ { "name": "E", "items": [ { "id": "A_B" }, { "id": "a_b" } ] } ] }"#,
        );
        assert!(matches!(reg.validate(), Err(SchemaError::NameCollision { .. })));
    }

    #[test]
    fn ops_members_cannot_shadow_collection_access() {
        let reg = registry(
            r#"{ "classes": [
                { "name": "Item" },
                { "name": "Items", "methods": [ { "id": "find", "returns": { "kind": "pointer", "class": "Item" } } ] },
                { "name": "Owner", "properties": [
                    { "id": "items", "ty": { "kind": "collection", "element": "Item", "ops": "Items" } } ] } ] }"#,
        );
        reg.validate().unwrap();

        let reg = registry(
            r#"{ "classes": [
                { "name": "Item" },
                { "name": "Items", "methods": [ { "id": "get", "returns": { "kind": "pointer", "class": "Item" } } ] },
                { "name": "Owner", "properties": [
                    { "id": "items", "ty": { "kind": "collection", "element": "Item", "ops": "Items" } } ] } ] }"#,
        );
        match reg.validate() {
            Err(SchemaError::NameCollision { owner, name }) => {
                assert_eq!(owner, "Items");
                assert_eq!(name, "get");
            }
            other => panic!("expected a collision, got {other:?}"),
        }

        // the same member is fine on a class that is never used as ops
        let reg = registry(
            r#"{ "classes": [
                { "name": "Item", "methods": [ { "id": "get", "returns": { "kind": "integer" } } ] } ] }"#,
        );
        reg.validate().unwrap();
    }

    #[test]
    fn readonly_and_collections_have_no_setter() {
        let reg = registry(
            r#"{ "classes": [ { "name": "A", "properties": [
                { "id": "items", "ty": { "kind": "collection", "element": "A" } },
                { "id": "set_items", "ty": { "kind": "boolean" }, "readonly": true } ] } ] }"#,
        );
        reg.validate().unwrap();
    }

    #[test]
    fn reserved_type_names() {
        let reg = registry(r#"{ "classes": [ { "name": "Collection" } ] }"#);
        assert!(matches!(reg.validate(), Err(SchemaError::InvalidName { .. })));
        let reg = registry(r#"{ "classes": [ { "name": "type" } ] }"#);
        assert!(matches!(reg.validate(), Err(SchemaError::InvalidName { .. })));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            Registry::load("/nonexistent/schema.json"),
            Err(SchemaError::Io { .. })
        ));
    }
}
