//! Place (listing) entity.
//!
//! # Invariants
//! - `title`: 1–100 characters, not blank; `description` at most 1024.
//! - `price` is finite and non-negative.
//! - `latitude` ∈ [-90, 90], `longitude` ∈ [-180, 180].
//! - `owner` and `amenities` are ids only. Amenities form a set.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lodgebase_core::entity::base_attribute;
use lodgebase_core::{
    AmenityId, DomainResult, Entity, PlaceId, Record, Timestamps, UserId, validate,
};
use lodgebase_users::{User, UserView};

use crate::amenity::{Amenity, AmenityView};
use crate::review::{Review, ReviewView};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1024;

fn validate_title(value: &str) -> DomainResult<String> {
    validate::text("title", value, TITLE_MAX_LEN)
}

fn validate_description(value: &str) -> DomainResult<String> {
    validate::optional_text("description", value, DESCRIPTION_MAX_LEN)
}

fn validate_latitude(value: f64) -> DomainResult<f64> {
    validate::in_range("latitude", value, -90.0, 90.0)
}

fn validate_longitude(value: f64) -> DomainResult<f64> {
    validate::in_range("longitude", value, -180.0, 180.0)
}

/// Input for creating a place.
///
/// `owner_id` and `amenities` must be resolved by the caller before the place
/// is stored; the entity only records them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPlace {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: UserId,
    #[serde(default)]
    pub amenities: Vec<AmenityId>,
}

/// Partial update of a place. `amenities`, when present, replaces the set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<UserId>,
    pub amenities: Option<Vec<AmenityId>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: PlaceId,
    title: String,
    description: Option<String>,
    price: f64,
    latitude: f64,
    longitude: f64,
    owner_id: UserId,
    amenities: BTreeSet<AmenityId>,
    timestamps: Timestamps,
}

impl Place {
    pub fn new(input: NewPlace) -> DomainResult<Self> {
        let title = validate_title(&input.title)?;
        let description = input
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        let price = validate::non_negative("price", input.price)?;
        let latitude = validate_latitude(input.latitude)?;
        let longitude = validate_longitude(input.longitude)?;

        Ok(Self {
            id: PlaceId::new(),
            title,
            description,
            price,
            latitude,
            longitude,
            owner_id: input.owner_id,
            amenities: input.amenities.into_iter().collect(),
            timestamps: Timestamps::now(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn amenities(&self) -> &BTreeSet<AmenityId> {
        &self.amenities
    }

    pub fn has_amenity(&self, amenity_id: &AmenityId) -> bool {
        self.amenities.contains(amenity_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    pub fn set_title(&mut self, value: &str) -> DomainResult<()> {
        self.title = validate_title(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_description(&mut self, value: Option<&str>) -> DomainResult<()> {
        self.description = value.map(validate_description).transpose()?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_price(&mut self, value: f64) -> DomainResult<()> {
        self.price = validate::non_negative("price", value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_latitude(&mut self, value: f64) -> DomainResult<()> {
        self.latitude = validate_latitude(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_longitude(&mut self, value: f64) -> DomainResult<()> {
        self.longitude = validate_longitude(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_owner(&mut self, owner_id: UserId) {
        self.owner_id = owner_id;
        self.timestamps.touch();
    }

    pub fn set_amenities(&mut self, amenities: impl IntoIterator<Item = AmenityId>) {
        self.amenities = amenities.into_iter().collect();
        self.timestamps.touch();
    }

    /// Returns `false` if the amenity was already attached.
    pub fn add_amenity(&mut self, amenity_id: AmenityId) -> bool {
        let inserted = self.amenities.insert(amenity_id);
        if inserted {
            self.timestamps.touch();
        }
        inserted
    }

    /// Returns `false` if the amenity was not attached.
    pub fn remove_amenity(&mut self, amenity_id: &AmenityId) -> bool {
        let removed = self.amenities.remove(amenity_id);
        if removed {
            self.timestamps.touch();
        }
        removed
    }

    pub fn view(&self) -> PlaceView {
        PlaceView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
            owner_id: self.owner_id.clone(),
            amenities: self.amenities.iter().cloned().collect(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }

    /// Nested view: owner, amenities and reviews rendered through their own
    /// flat views (one level deep).
    pub fn details(&self, owner: &User, amenities: &[Amenity], reviews: &[Review]) -> PlaceDetails {
        PlaceDetails {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
            owner: owner.view(),
            amenities: amenities.iter().map(Amenity::view).collect(),
            reviews: reviews.iter().map(Review::view).collect(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }
}

impl Entity for Place {
    type Id = PlaceId;

    const KIND: &'static str = "place";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Record for Place {
    type Patch = PlacePatch;

    fn apply_patch(&mut self, patch: &PlacePatch) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(value) = &patch.title {
            next.set_title(value)?;
        }
        if let Some(value) = &patch.description {
            next.set_description(Some(value))?;
        }
        if let Some(value) = patch.price {
            next.set_price(value)?;
        }
        if let Some(value) = patch.latitude {
            next.set_latitude(value)?;
        }
        if let Some(value) = patch.longitude {
            next.set_longitude(value)?;
        }
        if let Some(owner_id) = &patch.owner_id {
            next.set_owner(owner_id.clone());
        }
        if let Some(amenities) = &patch.amenities {
            next.set_amenities(amenities.iter().cloned());
        }
        *self = next;
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "title" => Some(self.title.clone().into()),
            "description" => Some(self.description.clone().into()),
            "price" => Some(self.price.into()),
            "latitude" => Some(self.latitude.into()),
            "longitude" => Some(self.longitude.into()),
            "owner_id" => Some(self.owner_id.to_string().into()),
            "amenities" => serde_json::to_value(&self.amenities).ok(),
            _ => base_attribute(self, name),
        }
    }
}

/// Canonical flat view of a place (relations as ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceView {
    pub id: PlaceId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: UserId,
    pub amenities: Vec<AmenityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Place with its owner, amenities and reviews embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub id: PlaceId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner: UserView,
    pub amenities: Vec<AmenityView>,
    pub reviews: Vec<ReviewView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
