use serde::{Deserialize, Deserializer, Serialize};

/// One plant's descriptive fields as returned by the lookup client.
///
/// Every field is a string. Values the remote side leaves out (or sends as
/// `null`) decode to empty strings so the detail view never has a failure path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlantRecordWire")]
pub struct PlantRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub family: String,
    pub genus: String,
    /// Image location. The remote API may send `image_url` instead.
    pub http_image_url: String,
}

/// Decoding shape. Both image keys are accepted; `http_image_url` wins when
/// both are non-empty.
#[derive(Deserialize)]
struct PlantRecordWire {
    #[serde(default, deserialize_with = "null_as_empty")]
    common_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    scientific_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    family: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    genus: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    http_image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    image_url: String,
}

impl From<PlantRecordWire> for PlantRecord {
    fn from(wire: PlantRecordWire) -> Self {
        let http_image_url = if wire.http_image_url.is_empty() {
            wire.image_url
        } else {
            wire.http_image_url
        };
        Self {
            common_name: wire.common_name,
            scientific_name: wire.scientific_name,
            family: wire.family,
            genus: wire.genus,
            http_image_url,
        }
    }
}

impl PlantRecord {
    /// Name to show in a listing row, falling back to the scientific name.
    pub fn display_name(&self) -> &str {
        if self.common_name.trim().is_empty() {
            &self.scientific_name
        } else {
            &self.common_name
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_record() {
        let json = r#"{
            "common_name": "Dog rose",
            "scientific_name": "Rosa canina",
            "family": "Rosaceae",
            "genus": "Rosa",
            "http_image_url": "https://example.org/rosa.jpg"
        }"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.common_name, "Dog rose");
        assert_eq!(record.genus, "Rosa");
        assert_eq!(record.http_image_url, "https://example.org/rosa.jpg");
    }

    #[test]
    fn test_missing_and_null_fields_become_empty() {
        let json = r#"{"scientific_name": "Quercus robur", "common_name": null, "image_url": "x.png"}"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.common_name, "");
        assert_eq!(record.family, "");
        assert_eq!(record.http_image_url, "x.png");
    }

    #[test]
    fn test_both_image_keys_prefer_http_image_url() {
        let json = r#"{"common_name": "Fern", "image_url": "a.png", "http_image_url": "b.png"}"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.http_image_url, "b.png");

        let json = r#"{"image_url": "a.png", "http_image_url": null}"#;
        let record: PlantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.http_image_url, "a.png");
    }

    #[test]
    fn test_serialized_record_decodes_back() {
        let record = PlantRecord {
            common_name: "Fern".to_string(),
            http_image_url: "b.png".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<PlantRecord>(&json).unwrap(), record);
    }

    #[test]
    fn test_display_name_falls_back_to_scientific() {
        let record = PlantRecord {
            scientific_name: "Quercus robur".to_string(),
            ..Default::default()
        };
        assert_eq!(record.display_name(), "Quercus robur");
    }
}
