//! Detail screen projection.
//!
//! A read-only view of one [`PlantRecord`]. There is no failure path: missing
//! fields simply render as empty text.

use serde::Serialize;

use crate::plant::PlantRecord;

/// Everything the detail screen shows for one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantDetail {
    pub title: String,
    pub scientific_name: String,
    pub family: String,
    pub genus: String,
    pub image_url: String,
}

impl PlantDetail {
    pub fn from_record(record: &PlantRecord) -> Self {
        Self {
            title: record.common_name.clone(),
            scientific_name: record.scientific_name.clone(),
            family: record.family.clone(),
            genus: record.genus.clone(),
            image_url: record.http_image_url.clone(),
        }
    }

    /// The descriptive sentence under the title.
    pub fn description(&self) -> String {
        format!(
            "Scientific Name {}. This plant comes from the {} family and the {} genus.",
            self.scientific_name, self.family, self.genus
        )
    }

    /// Plain-text rendering: title, description, image location.
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.description(),
            format!("Image: {}", self.image_url),
        ]
    }
}

impl From<&PlantRecord> for PlantDetail {
    fn from(record: &PlantRecord) -> Self {
        Self::from_record(record)
    }
}
