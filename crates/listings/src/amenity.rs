//! Amenity entity (e.g. "Wifi", "Pool").
//!
//! Name uniqueness spans all amenities and is therefore enforced by the
//! facade; the entity only checks that the name is well-formed. Names are
//! stored trimmed and compared through [`name_key`], so "Wifi", " Wifi " and
//! "wifi" are the same amenity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lodgebase_core::entity::base_attribute;
use lodgebase_core::{AmenityId, DomainResult, Entity, Record, Timestamps, validate};

pub const NAME_MAX_LEN: usize = 128;

/// Comparison key for amenity names: trimmed and lowercased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAmenity {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmenityPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amenity {
    id: AmenityId,
    name: String,
    timestamps: Timestamps,
}

impl Amenity {
    pub fn new(input: NewAmenity) -> DomainResult<Self> {
        Ok(Self {
            id: AmenityId::new(),
            name: validate::text("name", &input.name, NAME_MAX_LEN)?,
            timestamps: Timestamps::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    pub fn set_name(&mut self, value: &str) -> DomainResult<()> {
        self.name = validate::text("name", value, NAME_MAX_LEN)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn view(&self) -> AmenityView {
        AmenityView {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }
}

impl Entity for Amenity {
    type Id = AmenityId;

    const KIND: &'static str = "amenity";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Record for Amenity {
    type Patch = AmenityPatch;

    fn apply_patch(&mut self, patch: &AmenityPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            self.set_name(name)?;
        }
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "name" => Some(self.name.clone().into()),
            "name_key" => Some(name_key(&self.name).into()),
            _ => base_attribute(self, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityView {
    pub id: AmenityId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodgebase_core::DomainError;

    fn wifi() -> NewAmenity {
        NewAmenity {
            name: "Wifi".to_string(),
        }
    }

    #[test]
    fn create_amenity() {
        let amenity = Amenity::new(wifi()).unwrap();
        assert_eq!(amenity.name(), "Wifi");
        assert_eq!(amenity.view().name, "Wifi");
        assert_eq!(amenity.attribute("name"), Some(serde_json::json!("Wifi")));
    }

    #[test]
    fn names_are_stored_trimmed_and_keyed_case_insensitively() {
        let amenity = Amenity::new(NewAmenity {
            name: "  Hot Tub ".to_string(),
        })
        .unwrap();
        assert_eq!(amenity.name(), "Hot Tub");
        assert_eq!(amenity.attribute("name_key"), Some(serde_json::json!("hot tub")));
        assert_eq!(name_key(" WIFI\t"), name_key("wifi"));
    }

    #[test]
    fn blank_or_oversized_names_are_rejected() {
        let oversized = "x".repeat(NAME_MAX_LEN + 1);
        for name in ["", "  ", oversized.as_str()] {
            match Amenity::new(NewAmenity { name: name.to_string() }) {
                Err(DomainError::Validation { field, .. }) => assert_eq!(field, "name"),
                other => panic!("Expected Validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn failed_patch_leaves_amenity_unchanged() {
        let mut amenity = Amenity::new(wifi()).unwrap();
        let before = amenity.clone();
        let patch = AmenityPatch {
            name: Some(String::new()),
        };
        assert!(amenity.apply_patch(&patch).is_err());
        assert_eq!(amenity, before);

        amenity
            .apply_patch(&AmenityPatch {
                name: Some("Fast wifi".to_string()),
            })
            .unwrap();
        assert_eq!(amenity.name(), "Fast wifi");
        assert_eq!(amenity.id(), before.id());
        assert_eq!(amenity.created_at(), before.created_at());
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut amenity = Amenity::new(wifi()).unwrap();
        let before = amenity.clone();
        amenity.apply_patch(&AmenityPatch::default()).unwrap();
        assert_eq!(amenity, before);
    }
}
