//! Facade: the single entry point transport code calls.
//!
//! The facade owns one repository per entity kind and is the only place that
//! knows how the kinds relate:
//!
//! ```text
//! request (typed input / attribute map, relations as ids)
//!   ↓
//! 1. resolve every referenced id (owner, amenities, author, place) → NotFound
//!   ↓
//! 2. uniqueness checks (email, amenity name)                       → Conflict
//!   ↓
//! 3. construct / patch the entity (field validation)               → Validation
//!   ↓
//! 4. store in the repository, then update the relation index
//! ```
//!
//! Steps 1–4 run under one mutex, so two concurrent mutations can never both
//! pass the same uniqueness check, and nothing is stored unless every step
//! succeeded. Single-entity reads go straight to the repositories.

mod amenities;
mod places;
mod reviews;
mod users;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lodgebase_core::{
    AmenityId, DomainError, DomainResult, Entity, PlaceId, ReviewId, UserId,
};
use lodgebase_listings::{Amenity, Place, Review};
use lodgebase_users::User;

use crate::config::{DeletePolicy, LodgebaseConfig};
use crate::relation_index::RelationIndex;
use crate::repository::{InMemoryRepository, Repository};

/// The repositories a facade is built over.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub amenities: Arc<dyn Repository<Amenity>>,
    pub places: Arc<dyn Repository<Place>>,
    pub reviews: Arc<dyn Repository<Review>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            amenities: Arc::new(InMemoryRepository::<Amenity>::new()),
            places: Arc::new(InMemoryRepository::<Place>::new()),
            reviews: Arc::new(InMemoryRepository::<Review>::new()),
        }
    }
}

/// Reverse lookups for every id reference held by an entity.
#[derive(Debug, Default)]
struct Relations {
    places_by_owner: RelationIndex<UserId, PlaceId>,
    places_by_amenity: RelationIndex<AmenityId, PlaceId>,
    reviews_by_place: RelationIndex<PlaceId, ReviewId>,
    reviews_by_author: RelationIndex<UserId, ReviewId>,
}

impl Relations {
    fn rebuild(repositories: &Repositories) -> Self {
        let mut relations = Self::default();
        for place in repositories.places.get_all() {
            relations.index_place(&place);
        }
        for review in repositories.reviews.get_all() {
            relations.index_review(&review);
        }
        relations
    }

    fn index_place(&mut self, place: &Place) {
        self.places_by_owner
            .link(place.owner_id().clone(), place.id().clone());
        for amenity_id in place.amenities() {
            self.places_by_amenity
                .link(amenity_id.clone(), place.id().clone());
        }
    }

    fn unindex_place(&mut self, place: &Place) {
        self.places_by_owner.unlink(place.owner_id(), place.id());
        for amenity_id in place.amenities() {
            self.places_by_amenity.unlink(amenity_id, place.id());
        }
    }

    fn reindex_place(&mut self, before: &Place, after: &Place) {
        self.places_by_owner
            .relink(before.owner_id(), after.owner_id().clone(), after.id().clone());
        for removed in before.amenities().difference(after.amenities()) {
            self.places_by_amenity.unlink(removed, after.id());
        }
        for added in after.amenities().difference(before.amenities()) {
            self.places_by_amenity.link(added.clone(), after.id().clone());
        }
    }

    fn index_review(&mut self, review: &Review) {
        self.reviews_by_place
            .link(review.place_id().clone(), review.id().clone());
        self.reviews_by_author
            .link(review.user_id().clone(), review.id().clone());
    }

    fn unindex_review(&mut self, review: &Review) {
        self.reviews_by_place.unlink(review.place_id(), review.id());
        self.reviews_by_author.unlink(review.user_id(), review.id());
    }

    fn reindex_review(&mut self, before: &Review, after: &Review) {
        self.reviews_by_place
            .relink(before.place_id(), after.place_id().clone(), after.id().clone());
        self.reviews_by_author
            .relink(before.user_id(), after.user_id().clone(), after.id().clone());
    }
}

/// Orchestrates users, amenities, places and reviews.
///
/// Construct one per process (or per test) and share it by reference or
/// through an `Arc`; there is no global instance.
pub struct Facade {
    users: Arc<dyn Repository<User>>,
    amenities: Arc<dyn Repository<Amenity>>,
    places: Arc<dyn Repository<Place>>,
    reviews: Arc<dyn Repository<Review>>,
    relations: Mutex<Relations>,
    delete_policy: DeletePolicy,
}

impl Facade {
    /// Build a facade over existing repositories, indexing whatever they
    /// already contain.
    pub fn new(delete_policy: DeletePolicy, repositories: Repositories) -> Self {
        let relations = Relations::rebuild(&repositories);
        let Repositories {
            users,
            amenities,
            places,
            reviews,
        } = repositories;

        Self {
            users,
            amenities,
            places,
            reviews,
            relations: Mutex::new(relations),
            delete_policy,
        }
    }

    pub fn in_memory(delete_policy: DeletePolicy) -> Self {
        Self::new(delete_policy, Repositories::in_memory())
    }

    pub fn from_config(config: &LodgebaseConfig) -> Self {
        Self::in_memory(config.delete_policy)
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    // Index updates are plain in-memory edits that cannot fail half-way, so the
    // guarded data stays usable even if another thread panicked while holding it.
    fn lock(&self) -> MutexGuard<'_, Relations> {
        self.relations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve_user(&self, id: &UserId) -> DomainResult<User> {
        self.users
            .get(id)
            .ok_or_else(|| DomainError::not_found(User::KIND, id))
    }

    fn resolve_amenity(&self, id: &AmenityId) -> DomainResult<Amenity> {
        self.amenities
            .get(id)
            .ok_or_else(|| DomainError::not_found(Amenity::KIND, id))
    }

    /// Every id must resolve; the first missing one fails the whole call.
    fn resolve_amenities(&self, ids: &[AmenityId]) -> DomainResult<Vec<Amenity>> {
        ids.iter().map(|id| self.resolve_amenity(id)).collect()
    }

    fn resolve_place(&self, id: &PlaceId) -> DomainResult<Place> {
        self.places
            .get(id)
            .ok_or_else(|| DomainError::not_found(Place::KIND, id))
    }

    fn resolve_review(&self, id: &ReviewId) -> DomainResult<Review> {
        self.reviews
            .get(id)
            .ok_or_else(|| DomainError::not_found(Review::KIND, id))
    }

    /// Remove a review and its index entries. Caller holds the lock.
    fn remove_review(&self, relations: &mut Relations, id: &ReviewId) {
        if let Some(review) = self.reviews.delete(id) {
            relations.unindex_review(&review);
        }
    }

    /// Remove a place after its reviews. Caller holds the lock.
    fn remove_place_cascading(&self, relations: &mut Relations, id: &PlaceId) {
        for review_id in relations.reviews_by_place.dependents(id) {
            self.remove_review(relations, &review_id);
        }
        if let Some(place) = self.places.delete(id) {
            relations.unindex_place(&place);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodgebase_listings::{NewPlace, NewReview};
    use lodgebase_users::NewUser;

    fn seeded_repositories() -> (Repositories, UserId, PlaceId) {
        let repositories = Repositories::in_memory();
        let user = User::new(NewUser {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret123".to_string(),
            is_admin: false,
        })
        .unwrap();
        let place = Place::new(NewPlace {
            title: "Loft".to_string(),
            description: None,
            price: 100.0,
            latitude: 40.0,
            longitude: -73.0,
            owner_id: user.id().clone(),
            amenities: Vec::new(),
        })
        .unwrap();
        let review = Review::new(NewReview {
            text: "Great".to_string(),
            rating: 5,
            user_id: user.id().clone(),
            place_id: place.id().clone(),
        })
        .unwrap();

        let user_id = user.id().clone();
        let place_id = place.id().clone();
        repositories.users.add(user).unwrap();
        repositories.places.add(place).unwrap();
        repositories.reviews.add(review).unwrap();
        (repositories, user_id, place_id)
    }

    #[test]
    fn new_indexes_preexisting_records() {
        let (repositories, user_id, place_id) = seeded_repositories();
        let facade = Facade::new(DeletePolicy::Restrict, repositories);

        assert_eq!(facade.reviews_for_place(&place_id).unwrap().len(), 1);
        assert_eq!(facade.places_for_owner(&user_id).unwrap().len(), 1);
        assert_eq!(facade.reviews_by_author(&user_id).unwrap().len(), 1);
    }

    #[test]
    fn from_config_uses_configured_policy() {
        let config = LodgebaseConfig {
            delete_policy: DeletePolicy::Cascade,
            ..LodgebaseConfig::default()
        };
        assert_eq!(Facade::from_config(&config).delete_policy(), DeletePolicy::Cascade);
    }

    #[test]
    fn facade_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Facade>();
    }
}
