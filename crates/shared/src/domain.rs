use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

pub const AGE_FIELD: &str = "Umur";
pub const DIAGNOSIS_MASUK_FIELD: &str = "diagnosis_masuk";
pub const DIAGNOSIS_PRIMER_FIELD: &str = "diagnosis_primer";

pub const DEFAULT_AGE: f64 = 30.0;
/// Suggested age bounds. Shown as a hint next to the input, never enforced.
pub const AGE_HINT_MIN: f64 = 4.0;
pub const AGE_HINT_MAX: f64 = 105.0;

/// Categorical fields rendered first, in this order, when the schema has them.
pub const CATEGORICAL_PRIORITY: [&str; 6] = [
    "Jenis Kelamin",
    "Segmentasi Peserta",
    "Kepemilikan FKRTL",
    "Jenis FKRTL",
    "Tingkat Pelayanan FKRTL",
    "Jenis Poli FKRTL",
];

/// Separator between code and description in a diagnosis suggestion.
pub const DIAGNOSIS_LABEL_SEPARATOR: &str = " — ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisKind {
    Masuk,
    Primer,
}

impl DiagnosisKind {
    pub const ALL: [DiagnosisKind; 2] = [DiagnosisKind::Masuk, DiagnosisKind::Primer];

    pub fn field_name(self) -> &'static str {
        match self {
            DiagnosisKind::Masuk => DIAGNOSIS_MASUK_FIELD,
            DiagnosisKind::Primer => DIAGNOSIS_PRIMER_FIELD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiagnosisKind::Masuk => "Diagnosis Masuk (cari dengan nama diagnosis)",
            DiagnosisKind::Primer => "Diagnosis Primer (cari dengan nama diagnosis)",
        }
    }
}

/// A single form value: the age is numeric, everything else is text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

// Whole numbers go over the wire as JSON integers (`30`, not `30.0`).
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(value) => match whole_number(*value) {
                Some(whole) => serializer.serialize_i64(whole),
                None => serializer.serialize_f64(*value),
            },
            FieldValue::Text(value) => serializer.serialize_str(value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => match whole_number(*value) {
                Some(whole) => write!(f, "{whole}"),
                None => write!(f, "{value}"),
            },
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}
