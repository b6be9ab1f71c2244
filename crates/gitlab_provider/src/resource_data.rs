//! Working copy of a resource handed to each lifecycle operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ProviderResult};
use crate::schema::{AttributeValue, ResourceSchema};

#[cfg(test)]
#[path = "resource_data_tests.rs"]
mod tests;

/// Persisted form of a tracked resource: its identity and its last known attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// The identity and attribute values an operation reads from and writes to.
///
/// Alongside the current values it remembers the prior state the resource was loaded from,
/// which is what [`ResourceData::has_change`] compares against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    values: BTreeMap<String, AttributeValue>,
    prior: BTreeMap<String, AttributeValue>,
}

impl ResourceData {
    /// Data for a resource that does not exist yet.
    pub fn from_config(
        schema: &ResourceSchema,
        config: BTreeMap<String, AttributeValue>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            id: None,
            values: schema.resolve(config)?,
            prior: BTreeMap::new(),
        })
    }

    /// Data for an existing resource, with no pending changes.
    pub fn from_state(state: &ResourceState) -> Self {
        Self {
            id: Some(state.id.clone()),
            values: state.attributes.clone(),
            prior: state.attributes.clone(),
        }
    }

    /// Data for an existing resource that should be brought to a new configuration.
    pub fn for_update(
        schema: &ResourceSchema,
        state: &ResourceState,
        config: BTreeMap<String, AttributeValue>,
    ) -> ProviderResult<Self> {
        Ok(Self {
            id: Some(state.id.clone()),
            values: schema.resolve(config)?,
            prior: state.attributes.clone(),
        })
    }

    /// Data for adopting an existing remote object; the id holds the raw import key.
    pub fn for_import(key: impl Into<String>) -> Self {
        Self {
            id: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the id, failing if none has been assigned.
    pub fn require_id(&self) -> ProviderResult<&str> {
        self.id().ok_or(Error::MissingResourceId)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Clears the identity, marking the resource as absent.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Returns a string attribute, or the empty string when it is unset.
    pub fn get_string(&self, name: &str) -> ProviderResult<String> {
        match self.values.get(name) {
            None => Ok(String::new()),
            Some(AttributeValue::String(s)) => Ok(s.clone()),
            Some(AttributeValue::Bool(_)) => Err(type_error(name, "string")),
        }
    }

    /// Returns a string attribute only when it is set to a non-empty value.
    pub fn get_non_empty_string(&self, name: &str) -> ProviderResult<Option<String>> {
        let value = self.get_string(name)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    /// Returns a boolean attribute, or `false` when it is unset.
    pub fn get_bool(&self, name: &str) -> ProviderResult<bool> {
        match self.values.get(name) {
            None => Ok(false),
            Some(AttributeValue::Bool(b)) => Ok(*b),
            Some(AttributeValue::String(_)) => Err(type_error(name, "bool")),
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Sets the attribute when `value` is `Some`, and removes it otherwise.
    pub fn set_optional(&mut self, name: &str, value: Option<impl Into<AttributeValue>>) {
        match value {
            Some(v) => self.set(name, v),
            None => {
                self.values.remove(name);
            }
        }
    }

    /// Reports whether the attribute differs from the prior state.
    ///
    /// An unset attribute and an empty string are considered equal.
    pub fn has_change(&self, name: &str) -> bool {
        normalized(self.prior.get(name)) != normalized(self.values.get(name))
    }

    pub fn values(&self) -> &BTreeMap<String, AttributeValue> {
        &self.values
    }

    /// Snapshot of the resource for persisting, or `None` if it no longer exists.
    pub fn to_state(&self) -> Option<ResourceState> {
        self.id().map(|id| ResourceState {
            id: id.to_string(),
            attributes: self.values.clone(),
        })
    }
}

fn normalized(value: Option<&AttributeValue>) -> Option<&AttributeValue> {
    match value {
        Some(AttributeValue::String(s)) if s.is_empty() => None,
        other => other,
    }
}

fn type_error(name: &str, expected: &'static str) -> Error {
    Error::AttributeType {
        name: name.to_string(),
        expected,
    }
}
