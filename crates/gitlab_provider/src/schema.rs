//! Resource schema definitions.
//!
//! A [`ResourceSchema`] lists the attributes a resource type accepts together with their type,
//! whether they are required, their default and whether they are sensitive or force the
//! resource to be replaced when changed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ProviderResult};

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// The value of a single resource attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    String(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }

    fn attr_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::String(_) => AttributeType::String,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Primitive types an attribute can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
        }
    }
}

/// Definition of a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<AttributeValue>,
    pub sensitive: bool,
    pub force_new: bool,
}

impl Attribute {
    fn new(name: &'static str, description: &'static str, attr_type: AttributeType) -> Self {
        Self {
            name,
            description,
            attr_type,
            required: false,
            default: None,
            sensitive: false,
            force_new: false,
        }
    }

    pub fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, description, AttributeType::String)
        }
    }

    pub fn optional_string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, AttributeType::String)
    }

    pub fn optional_bool(name: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            default: Some(AttributeValue::Bool(default)),
            ..Self::new(name, description, AttributeType::Bool)
        }
    }

    /// Marks the attribute as secret: it is masked whenever state is displayed.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Marks the attribute as immutable: changing it requires replacing the resource.
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}

/// The full set of attributes accepted by one resource type.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub description: &'static str,
    attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self {
            description,
            attributes,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|a| a.sensitive)
    }

    /// Validates a user supplied configuration and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names an attribute the schema does not define,
    /// omits a required attribute, or supplies a value of the wrong type.
    pub fn resolve(
        &self,
        config: BTreeMap<String, AttributeValue>,
    ) -> ProviderResult<BTreeMap<String, AttributeValue>> {
        if let Some(unknown) = config.keys().find(|k| self.attribute(k).is_none()) {
            return Err(Error::UnknownAttribute(unknown.clone()));
        }

        let mut resolved = BTreeMap::new();
        for attribute in &self.attributes {
            match config.get(attribute.name) {
                Some(value) if value.attr_type() != attribute.attr_type => {
                    return Err(Error::AttributeType {
                        name: attribute.name.to_string(),
                        expected: attribute.attr_type.as_str(),
                    });
                }
                Some(value) => {
                    resolved.insert(attribute.name.to_string(), value.clone());
                }
                None if attribute.required => {
                    return Err(Error::MissingAttribute(attribute.name.to_string()));
                }
                None => {
                    if let Some(default) = &attribute.default {
                        resolved.insert(attribute.name.to_string(), default.clone());
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Lists the force-new attributes whose value differs between two attribute sets.
    pub fn replacement_attributes(
        &self,
        prior: &BTreeMap<String, AttributeValue>,
        planned: &BTreeMap<String, AttributeValue>,
    ) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.force_new && prior.get(a.name) != planned.get(a.name))
            .map(|a| a.name)
            .collect()
    }
}
