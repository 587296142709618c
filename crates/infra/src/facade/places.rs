use tracing::debug;

use lodgebase_core::{DomainError, DomainResult, Entity, PlaceId, UserId};
use lodgebase_listings::{NewPlace, Place, PlaceDetails, PlacePatch, Review};

use super::{Facade, Relations};
use crate::config::DeletePolicy;
use crate::repository::Repository;

impl Facade {
    /// Create a place. The owner and every listed amenity must already exist.
    pub fn create_place(&self, input: NewPlace) -> DomainResult<Place> {
        let mut relations = self.lock();
        self.resolve_user(&input.owner_id)?;
        self.resolve_amenities(&input.amenities)?;

        let place = Place::new(input)?;
        self.places.add(place.clone())?;
        relations.index_place(&place);

        debug!(
            place_id = %place.id(),
            owner_id = %place.owner_id(),
            amenities = place.amenities().len(),
            "place created"
        );
        Ok(place)
    }

    pub fn get_place(&self, id: &PlaceId) -> Option<Place> {
        self.places.get(id)
    }

    pub fn get_all_places(&self) -> Vec<Place> {
        self.places.get_all()
    }

    /// Patch a place. A new owner or amenity set is resolved before anything
    /// changes; `amenities` replaces the whole set.
    pub fn update_place(&self, id: &PlaceId, patch: &PlacePatch) -> DomainResult<Place> {
        let mut relations = self.lock();
        let before = self.resolve_place(id)?;
        if let Some(owner_id) = &patch.owner_id {
            self.resolve_user(owner_id)?;
        }
        if let Some(amenities) = &patch.amenities {
            self.resolve_amenities(amenities)?;
        }

        let after = self.places.update(id, patch)?;
        relations.reindex_place(&before, &after);

        debug!(place_id = %id, "place updated");
        Ok(after)
    }

    /// Delete a place. Deleting an unknown id is a no-op.
    ///
    /// Under [`DeletePolicy::Restrict`] a reviewed place is kept and `Conflict`
    /// is returned. Under [`DeletePolicy::Cascade`] its reviews go with it.
    pub fn delete_place(&self, id: &PlaceId) -> DomainResult<()> {
        let mut relations = self.lock();
        if self.places.get(id).is_none() {
            return Ok(());
        }

        let reviews = relations.reviews_by_place.dependents(id);
        if self.delete_policy == DeletePolicy::Restrict && !reviews.is_empty() {
            return Err(DomainError::conflict(format!(
                "{} `{id}` still has {} review(s)",
                Place::KIND,
                reviews.len()
            )));
        }

        self.remove_place_cascading(&mut relations, id);
        debug!(place_id = %id, reviews = reviews.len(), "place deleted");
        Ok(())
    }

    /// Places owned by `owner_id`, in id order.
    pub fn places_for_owner(&self, owner_id: &UserId) -> DomainResult<Vec<Place>> {
        let relations = self.lock();
        self.resolve_user(owner_id)?;

        Ok(relations
            .places_by_owner
            .dependents(owner_id)
            .iter()
            .filter_map(|place_id| self.places.get(place_id))
            .collect())
    }

    /// A place with its owner, amenities and reviews embedded.
    pub fn place_details(&self, id: &PlaceId) -> DomainResult<PlaceDetails> {
        let relations = self.lock();
        let place = self.resolve_place(id)?;
        let owner = self.resolve_user(place.owner_id())?;
        let amenities: Vec<_> = place
            .amenities()
            .iter()
            .filter_map(|amenity_id| self.amenities.get(amenity_id))
            .collect();
        let reviews = self.reviews_of(&relations, id);

        Ok(place.details(&owner, &amenities, &reviews))
    }

    /// Caller holds the lock.
    pub(super) fn reviews_of(&self, relations: &Relations, place_id: &PlaceId) -> Vec<Review> {
        relations
            .reviews_by_place
            .dependents(place_id)
            .iter()
            .filter_map(|review_id| self.reviews.get(review_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use lodgebase_core::{AmenityId, ErrorKind};
    use lodgebase_listings::{NewAmenity, NewReview};
    use lodgebase_users::{NewUser, User};

    use super::*;

    fn user(facade: &Facade, email: &str) -> User {
        facade
            .create_user(NewUser {
                first_name: "Ana".to_string(),
                last_name: "Lee".to_string(),
                email: email.to_string(),
                password: "secret123".to_string(),
                is_admin: false,
            })
            .unwrap()
    }

    fn amenity(facade: &Facade, name: &str) -> AmenityId {
        facade
            .create_amenity(NewAmenity {
                name: name.to_string(),
            })
            .unwrap()
            .id()
            .clone()
    }

    fn loft(owner_id: &UserId, amenities: Vec<AmenityId>) -> NewPlace {
        NewPlace {
            title: "Loft".to_string(),
            description: Some("Bright and central".to_string()),
            price: 100.0,
            latitude: 40.0,
            longitude: -73.0,
            owner_id: owner_id.clone(),
            amenities,
        }
    }

    #[test]
    fn create_place_resolves_owner_and_amenities() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let owner = user(&facade, "ana@example.com");
        let wifi = amenity(&facade, "Wifi");

        let place = facade.create_place(loft(owner.id(), vec![wifi.clone()])).unwrap();
        assert!(place.has_amenity(&wifi));
        assert_eq!(facade.get_place(place.id()), Some(place.clone()));
        assert_eq!(facade.places_for_owner(owner.id()).unwrap(), vec![place]);
    }

    #[test]
    fn unknown_references_are_not_found() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let owner = user(&facade, "ana@example.com");

        let err = facade
            .create_place(loft(&UserId::from("ghost"), Vec::new()))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::NotFound {
                kind: "user",
                id: "ghost".to_string()
            }
        );

        let err = facade
            .create_place(loft(owner.id(), vec![AmenityId::from("ghost")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(facade.get_all_places().is_empty());
    }

    #[test]
    fn update_place_moves_owner_and_amenities() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let ana = user(&facade, "ana@example.com");
        let bob = user(&facade, "bob@example.com");
        let wifi = amenity(&facade, "Wifi");
        let pool = amenity(&facade, "Pool");
        let place = facade.create_place(loft(ana.id(), vec![wifi.clone()])).unwrap();

        let patch = PlacePatch {
            owner_id: Some(bob.id().clone()),
            amenities: Some(vec![pool.clone()]),
            price: Some(120.0),
            ..PlacePatch::default()
        };
        let updated = facade.update_place(place.id(), &patch).unwrap();

        assert_eq!(updated.owner_id(), bob.id());
        assert_eq!(updated.price(), 120.0);
        assert!(updated.has_amenity(&pool) && !updated.has_amenity(&wifi));
        assert!(facade.places_for_owner(ana.id()).unwrap().is_empty());
        assert_eq!(facade.places_for_owner(bob.id()).unwrap().len(), 1);

        // Wifi is no longer attached, so it can be deleted under Restrict.
        facade.delete_amenity(&wifi).unwrap();
        assert_eq!(
            facade.delete_amenity(&pool).unwrap_err().kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn failed_update_changes_nothing() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let owner = user(&facade, "ana@example.com");
        let place = facade.create_place(loft(owner.id(), Vec::new())).unwrap();

        let ghost_owner = PlacePatch {
            owner_id: Some(UserId::from("ghost")),
            title: Some("Renamed".to_string()),
            ..PlacePatch::default()
        };
        assert_eq!(
            facade.update_place(place.id(), &ghost_owner).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let bad_latitude = PlacePatch {
            title: Some("Renamed".to_string()),
            latitude: Some(91.0),
            ..PlacePatch::default()
        };
        assert_eq!(
            facade.update_place(place.id(), &bad_latitude).unwrap_err().kind(),
            ErrorKind::ValidationFailed
        );

        assert_eq!(facade.get_place(place.id()), Some(place));
    }

    #[test]
    fn place_details_embed_related_views() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        let owner = user(&facade, "ana@example.com");
        let guest = user(&facade, "bob@example.com");
        let wifi = amenity(&facade, "Wifi");
        let place = facade.create_place(loft(owner.id(), vec![wifi])).unwrap();
        facade
            .create_review(NewReview {
                text: "Great".to_string(),
                rating: 5,
                user_id: guest.id().clone(),
                place_id: place.id().clone(),
            })
            .unwrap();

        let details = facade.place_details(place.id()).unwrap();
        assert_eq!(details.owner.email, "ana@example.com");
        assert_eq!(details.amenities.len(), 1);
        assert_eq!(details.amenities[0].name, "Wifi");
        assert_eq!(details.reviews.len(), 1);
        assert_eq!(details.reviews[0].text, "Great");

        assert_eq!(
            facade.place_details(&PlaceId::from("ghost")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn places_for_unknown_owner_is_not_found() {
        let facade = Facade::in_memory(DeletePolicy::Restrict);
        assert_eq!(
            facade.places_for_owner(&UserId::from("ghost")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
