use tracing::debug;

use lodgebase_core::{DomainResult, Entity, PlaceId, ReviewId, UserId};
use lodgebase_listings::{NewReview, Review, ReviewDetails, ReviewPatch};

use super::Facade;
use crate::repository::Repository;

impl Facade {
    /// Create a review. The author and the place must already exist.
    pub fn create_review(&self, input: NewReview) -> DomainResult<Review> {
        let mut relations = self.lock();
        self.resolve_user(&input.user_id)?;
        self.resolve_place(&input.place_id)?;

        let review = Review::new(input)?;
        self.reviews.add(review.clone())?;
        relations.index_review(&review);

        debug!(
            review_id = %review.id(),
            place_id = %review.place_id(),
            rating = review.rating(),
            "review created"
        );
        Ok(review)
    }

    pub fn get_review(&self, id: &ReviewId) -> Option<Review> {
        self.reviews.get(id)
    }

    pub fn get_all_reviews(&self) -> Vec<Review> {
        self.reviews.get_all()
    }

    /// Reviews of `place_id`, in id order.
    pub fn reviews_for_place(&self, place_id: &PlaceId) -> DomainResult<Vec<Review>> {
        let relations = self.lock();
        self.resolve_place(place_id)?;
        Ok(self.reviews_of(&relations, place_id))
    }

    /// Reviews written by `user_id`, in id order.
    pub fn reviews_by_author(&self, user_id: &UserId) -> DomainResult<Vec<Review>> {
        let relations = self.lock();
        self.resolve_user(user_id)?;

        Ok(relations
            .reviews_by_author
            .dependents(user_id)
            .iter()
            .filter_map(|review_id| self.reviews.get(review_id))
            .collect())
    }

    /// Patch a review. A new author or place is resolved before anything changes.
    pub fn update_review(&self, id: &ReviewId, patch: &ReviewPatch) -> DomainResult<Review> {
        let mut relations = self.lock();
        let before = self.resolve_review(id)?;
        if let Some(user_id) = &patch.user_id {
            self.resolve_user(user_id)?;
        }
        if let Some(place_id) = &patch.place_id {
            self.resolve_place(place_id)?;
        }

        let after = self.reviews.update(id, patch)?;
        relations.reindex_review(&before, &after);

        debug!(review_id = %id, "review updated");
        Ok(after)
    }

    /// Delete a review. Nothing depends on reviews, so this never conflicts;
    /// deleting an unknown id is a no-op.
    pub fn delete_review(&self, id: &ReviewId) -> DomainResult<()> {
        let mut relations = self.lock();
        if let Some(review) = self.reviews.delete(id) {
            relations.unindex_review(&review);
            debug!(review_id = %id, "review deleted");
        }
        Ok(())
    }

    /// A review with its author and place embedded.
    pub fn review_details(&self, id: &ReviewId) -> DomainResult<ReviewDetails> {
        let _relations = self.lock();
        let review = self.resolve_review(id)?;
        let author = self.resolve_user(review.user_id())?;
        let place = self.resolve_place(review.place_id())?;

        Ok(review.details(&author, &place))
    }
}
