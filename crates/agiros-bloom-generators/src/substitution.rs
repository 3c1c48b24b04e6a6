//! Substitution records handed to template rendering

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of one substitution field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubstitutionValue {
    Scalar(String),
    List(Vec<String>),
}

/// Field name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionRecord {
    fields: BTreeMap<String, SubstitutionValue>,
}

impl SubstitutionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scalar(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), SubstitutionValue::Scalar(value.into()));
    }

    pub fn set_list(&mut self, name: &str, values: Vec<String>) {
        self.fields.insert(name.to_string(), SubstitutionValue::List(values));
    }

    pub fn get(&self, name: &str) -> Option<&SubstitutionValue> {
        self.fields.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(SubstitutionValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.fields.get(name) {
            Some(SubstitutionValue::List(values)) => Some(values),
            _ => None,
        }
    }

    /// Append a value to a list field unless it is already present; a
    /// missing or scalar field becomes a one-element list
    pub fn push_unique(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.get_mut(name) {
            Some(SubstitutionValue::List(values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            _ => {
                self.fields.insert(name.to_string(), SubstitutionValue::List(vec![value]));
            }
        }
    }

    pub fn extend_unique<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.push_unique(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique() {
        let mut record = SubstitutionRecord::new();
        record.push_unique("Depends", "agiros-loong-ros-workspace");
        record.push_unique("Depends", "agiros-loong-ros-workspace");
        assert_eq!(record.list("Depends").unwrap(), ["agiros-loong-ros-workspace"]);
    }

    #[test]
    fn test_scalar_and_list_serialization() {
        let mut record = SubstitutionRecord::new();
        record.set_scalar("Package", "agiros-loong-foo");
        record.set_list("Depends", vec!["libfoo".to_string()]);

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Package"], "agiros-loong-foo");
        assert_eq!(json["Depends"][0], "libfoo");
    }
}
