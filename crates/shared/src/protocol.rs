use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /schema` body. Map-shaped fields keep the server's key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaPayload {
    #[serde(default, with = "ordered_map")]
    pub categorical: Vec<(String, Option<Vec<String>>)>,
    #[serde(default, with = "ordered_map")]
    pub diagnosis_masuk: Vec<(String, String)>,
    #[serde(default, with = "ordered_map")]
    pub diagnosis_primer: Vec<(String, String)>,
}

/// `POST /predict` body; `data` is the whole form state.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a, T: Serialize> {
    pub data: &'a T,
}

/// Successful `POST /predict` body. `prediction` is usually a number but any
/// JSON value is accepted and passed through. An explicit `null` is kept as
/// `Some(Value::Null)`; only an absent key is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub prediction: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `GET /` body: a short greeting and the list of routes the service exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIndex {
    pub message: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// (De)serializes a JSON object as a `Vec` of entries in document order.
pub mod ordered_map {
    use std::{fmt, marker::PhantomData};

    use serde::{
        de::{MapAccess, Visitor},
        ser::SerializeMap,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    pub fn serialize<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Duplicate keys: last one wins, first position kept.
                    if let Some(slot) = entries.iter_mut().find(|entry| entry.0 == key) {
                        slot.1 = value;
                    } else {
                        entries.push((key, value));
                    }
                }
                Ok(entries)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }
        }

        deserializer.deserialize_any(EntriesVisitor(PhantomData))
    }
}
