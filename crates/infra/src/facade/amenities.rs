use tracing::debug;

use lodgebase_core::{AmenityId, DomainError, DomainResult, Entity};
use lodgebase_listings::amenity::name_key;
use lodgebase_listings::{Amenity, AmenityPatch, NewAmenity, PlacePatch};

use super::Facade;
use crate::config::DeletePolicy;
use crate::repository::Repository;

impl Facade {
    /// Register an amenity. Names are unique across all amenities, ignoring
    /// case and surrounding whitespace.
    pub fn create_amenity(&self, input: NewAmenity) -> DomainResult<Amenity> {
        let amenity = Amenity::new(input)?;

        let _relations = self.lock();
        self.ensure_amenity_name_free(amenity.name(), None)?;
        self.amenities.add(amenity.clone())?;

        debug!(amenity_id = %amenity.id(), name = amenity.name(), "amenity created");
        Ok(amenity)
    }

    pub fn get_amenity(&self, id: &AmenityId) -> Option<Amenity> {
        self.amenities.get(id)
    }

    /// Look an amenity up by name, ignoring case and surrounding whitespace.
    pub fn get_amenity_by_name(&self, name: &str) -> Option<Amenity> {
        self.amenities
            .get_by_attribute("name_key", &serde_json::Value::from(name_key(name)))
    }

    pub fn get_all_amenities(&self) -> Vec<Amenity> {
        self.amenities.get_all()
    }

    pub fn update_amenity(&self, id: &AmenityId, patch: &AmenityPatch) -> DomainResult<Amenity> {
        let _relations = self.lock();
        self.resolve_amenity(id)?;
        if let Some(name) = &patch.name {
            self.ensure_amenity_name_free(name, Some(id))?;
        }

        let amenity = self.amenities.update(id, patch)?;
        debug!(amenity_id = %id, "amenity updated");
        Ok(amenity)
    }

    /// Delete an amenity. Deleting an unknown id is a no-op.
    ///
    /// Under [`DeletePolicy::Restrict`] an amenity still attached to a place is
    /// kept and `Conflict` is returned. Under [`DeletePolicy::Cascade`] it is
    /// detached from every place first; the places themselves survive.
    pub fn delete_amenity(&self, id: &AmenityId) -> DomainResult<()> {
        let mut relations = self.lock();
        if self.amenities.get(id).is_none() {
            return Ok(());
        }

        let places = relations.places_by_amenity.dependents(id);
        if self.delete_policy == DeletePolicy::Restrict && !places.is_empty() {
            return Err(DomainError::conflict(format!(
                "{} `{id}` is still offered by {} place(s)",
                Amenity::KIND,
                places.len()
            )));
        }

        for place_id in &places {
            let Some(place) = self.places.get(place_id) else {
                continue;
            };
            let remaining = place
                .amenities()
                .iter()
                .filter(|amenity_id| *amenity_id != id)
                .cloned()
                .collect();
            let detach = PlacePatch {
                amenities: Some(remaining),
                ..PlacePatch::default()
            };
            self.places.update(place_id, &detach)?;
        }
        relations.places_by_amenity.remove_key(id);
        self.amenities.delete(id);

        debug!(amenity_id = %id, detached_from = places.len(), "amenity deleted");
        Ok(())
    }

    /// Caller holds the lock.
    fn ensure_amenity_name_free(&self, name: &str, except: Option<&AmenityId>) -> DomainResult<()> {
        match self.get_amenity_by_name(name) {
            Some(existing) if Some(existing.id()) != except => Err(DomainError::conflict(
                format!("amenity `{}` already exists", existing.name()),
            )),
            _ => Ok(()),
        }
    }
}
