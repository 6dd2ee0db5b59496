use std::collections::BTreeMap;

use serde::Serialize;
use shared::domain::{
    FieldValue, AGE_FIELD, DEFAULT_AGE, DIAGNOSIS_MASUK_FIELD, DIAGNOSIS_PRIMER_FIELD,
};

use crate::schema::Schema;

/// Current value of every form field, keyed by field name. Serializes as a
/// flat JSON object, which is what the predict endpoint expects under `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    fields: BTreeMap<String, FieldValue>,
}

impl FormState {
    /// Defaults for a freshly loaded schema: age 30, the first option of every
    /// categorical field, and empty diagnoses (the user has to pick those).
    pub fn from_schema(schema: &Schema) -> Self {
        let mut form = Self::default();
        form.set_field(AGE_FIELD, DEFAULT_AGE);
        for field in &schema.categorical {
            form.set_field(field.name.clone(), field.default_value());
        }
        form.set_field(DIAGNOSIS_MASUK_FIELD, "");
        form.set_field(DIAGNOSIS_PRIMER_FIELD, "");
        form
    }

    /// Replaces one field. No range or type checks happen here.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Text value of `key`, or `""` when it is missing or numeric.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn age(&self) -> Option<f64> {
        self.get(AGE_FIELD).and_then(FieldValue::as_number)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
