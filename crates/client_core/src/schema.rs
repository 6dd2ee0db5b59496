//! Validated form schema: categorical fields in server order plus the two
//! diagnosis lookup tables.

use shared::{
    domain::{DiagnosisKind, CATEGORICAL_PRIORITY, DIAGNOSIS_LABEL_SEPARATOR},
    protocol::SchemaPayload,
};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalField {
    pub name: String,
    pub options: Vec<String>,
}

impl CategoricalField {
    /// First listed option, or an empty string when there are none.
    pub fn default_value(&self) -> &str {
        self.options.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisEntry {
    pub code: String,
    pub description: String,
}

impl DiagnosisEntry {
    /// `"<code> — <description>"`; this is also the value stored when the
    /// suggestion is picked.
    pub fn label(&self) -> String {
        format!("{}{DIAGNOSIS_LABEL_SEPARATOR}{}", self.code, self.description)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisCatalog {
    entries: Vec<DiagnosisEntry>,
}

impl DiagnosisCatalog {
    pub fn entries(&self) -> &[DiagnosisEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose label contains `query`, ignoring case. A blank query
    /// matches everything.
    pub fn suggestions<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a DiagnosisEntry> + 'a {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| needle.is_empty() || entry.label().to_lowercase().contains(&needle))
    }
}

impl FromIterator<(String, String)> for DiagnosisCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(code, description)| DiagnosisEntry { code, description })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub categorical: Vec<CategoricalField>,
    pub diagnosis_masuk: DiagnosisCatalog,
    pub diagnosis_primer: DiagnosisCatalog,
}

impl Schema {
    /// Stand-in used when the schema cannot be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse_json(bytes: &[u8]) -> Result<Self, ClientError> {
        let payload: SchemaPayload = serde_json::from_slice(bytes)
            .map_err(|err| ClientError::InvalidSchema(err.to_string()))?;
        Ok(Self::from(payload))
    }

    pub fn categorical_field(&self, name: &str) -> Option<&CategoricalField> {
        self.categorical.iter().find(|field| field.name == name)
    }

    pub fn diagnosis(&self, kind: DiagnosisKind) -> &DiagnosisCatalog {
        match kind {
            DiagnosisKind::Masuk => &self.diagnosis_masuk,
            DiagnosisKind::Primer => &self.diagnosis_primer,
        }
    }

    /// Categorical fields in display order: the priority fields that exist,
    /// then everything else in schema order.
    pub fn render_order(&self) -> Vec<&CategoricalField> {
        let prioritized = CATEGORICAL_PRIORITY
            .iter()
            .filter_map(|name| self.categorical_field(name));
        let rest = self
            .categorical
            .iter()
            .filter(|field| !CATEGORICAL_PRIORITY.contains(&field.name.as_str()));
        prioritized.chain(rest).collect()
    }

    pub fn to_payload(&self) -> SchemaPayload {
        let lookup = |catalog: &DiagnosisCatalog| {
            catalog
                .entries()
                .iter()
                .map(|entry| (entry.code.clone(), entry.description.clone()))
                .collect()
        };
        SchemaPayload {
            categorical: self
                .categorical
                .iter()
                .map(|field| (field.name.clone(), Some(field.options.clone())))
                .collect(),
            diagnosis_masuk: lookup(&self.diagnosis_masuk),
            diagnosis_primer: lookup(&self.diagnosis_primer),
        }
    }
}

impl From<SchemaPayload> for Schema {
    fn from(payload: SchemaPayload) -> Self {
        Self {
            categorical: payload
                .categorical
                .into_iter()
                .map(|(name, options)| CategoricalField {
                    name,
                    options: options.unwrap_or_default(),
                })
                .collect(),
            diagnosis_masuk: payload.diagnosis_masuk.into_iter().collect(),
            diagnosis_primer: payload.diagnosis_primer.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_from(raw: &str) -> Schema {
        Schema::parse_json(raw.as_bytes()).expect("schema")
    }

    #[test]
    fn render_order_puts_priority_fields_first() {
        let schema = schema_from(
            r#"{"categorical": {
                "Kelas Rawat": ["1", "2"],
                "Jenis FKRTL": ["Rumah sakit"],
                "Jenis Kelamin": ["LAKI-LAKI", "PEREMPUAN"],
                "Provinsi": ["DKI"]
            }}"#,
        );
        let names: Vec<&str> = schema
            .render_order()
            .into_iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Jenis Kelamin", "Jenis FKRTL", "Kelas Rawat", "Provinsi"]
        );
    }

    #[test]
    fn empty_option_list_defaults_to_empty_string() {
        let schema = schema_from(r#"{"categorical": {"Segmentasi Peserta": [], "X": null}}"#);
        assert_eq!(schema.categorical[0].default_value(), "");
        assert_eq!(schema.categorical[1].default_value(), "");
        assert!(schema.categorical[1].options.is_empty());
    }

    #[test]
    fn suggestion_labels_use_em_dash() {
        let schema = schema_from(r#"{"diagnosis_masuk": {"A00": "Cholera"}}"#);
        let entry = &schema.diagnosis(DiagnosisKind::Masuk).entries()[0];
        assert_eq!(entry.label(), "A00 — Cholera");
    }

    #[test]
    fn suggestions_filter_case_insensitively_on_code_and_description() {
        let schema = schema_from(
            r#"{"diagnosis_primer": {
                "A00": "Cholera",
                "N20": "Calculus of kidney and ureter",
                "A90": "Dengue fever"
            }}"#,
        );
        let catalog = schema.diagnosis(DiagnosisKind::Primer);
        let codes = |query: &str| -> Vec<String> {
            catalog
                .suggestions(query)
                .map(|entry| entry.code.clone())
                .collect()
        };
        assert_eq!(codes("KIDNEY"), vec!["N20"]);
        assert_eq!(codes("a9"), vec!["A90"]);
        assert_eq!(codes("  "), vec!["A00", "N20", "A90"]);
        assert!(codes("zzz").is_empty());
    }

    #[test]
    fn malformed_schema_is_rejected_at_the_boundary() {
        assert!(matches!(
            Schema::parse_json(b"<html>oops</html>"),
            Err(ClientError::InvalidSchema(_))
        ));
        assert!(matches!(
            Schema::parse_json(br#"{"categorical": {"Jenis Kelamin": "L"}}"#),
            Err(ClientError::InvalidSchema(_))
        ));
    }

    #[test]
    fn payload_conversion_preserves_order() {
        let schema = schema_from(
            r#"{"categorical": {"B": ["x"], "A": ["y"]}, "diagnosis_masuk": {"Z1": "z", "A1": "a"}}"#,
        );
        let payload = schema.to_payload();
        assert_eq!(payload.categorical[0].0, "B");
        assert_eq!(payload.diagnosis_masuk[0].0, "Z1");
        assert_eq!(Schema::from(payload), schema);
    }
}
