//! Review entity: a rated comment left by a user on a place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lodgebase_core::entity::base_attribute;
use lodgebase_core::{DomainResult, Entity, PlaceId, Record, ReviewId, Timestamps, UserId, validate};
use lodgebase_users::{User, UserView};

use crate::place::{Place, PlaceView};

pub const TEXT_MAX_LEN: usize = 1024;
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

fn validate_text(value: &str) -> DomainResult<String> {
    validate::text("text", value, TEXT_MAX_LEN)
}

fn validate_rating(value: i64) -> DomainResult<u8> {
    let rating = validate::int_in_range("rating", value, RATING_MIN, RATING_MAX)?;
    // Bounded to 1..=5 above.
    Ok(rating as u8)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewReview {
    pub text: String,
    pub rating: i64,
    pub user_id: UserId,
    pub place_id: PlaceId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<i64>,
    pub user_id: Option<UserId>,
    pub place_id: Option<PlaceId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    text: String,
    rating: u8,
    user_id: UserId,
    place_id: PlaceId,
    timestamps: Timestamps,
}

impl Review {
    pub fn new(input: NewReview) -> DomainResult<Self> {
        let text = validate_text(&input.text)?;
        let rating = validate_rating(input.rating)?;

        Ok(Self {
            id: ReviewId::new(),
            text,
            rating,
            user_id: input.user_id,
            place_id: input.place_id,
            timestamps: Timestamps::now(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Author of the review.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn place_id(&self) -> &PlaceId {
        &self.place_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    pub fn set_text(&mut self, value: &str) -> DomainResult<()> {
        self.text = validate_text(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_rating(&mut self, value: i64) -> DomainResult<()> {
        self.rating = validate_rating(value)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_author(&mut self, user_id: UserId) {
        self.user_id = user_id;
        self.timestamps.touch();
    }

    pub fn set_place(&mut self, place_id: PlaceId) {
        self.place_id = place_id;
        self.timestamps.touch();
    }

    pub fn view(&self) -> ReviewView {
        ReviewView {
            id: self.id.clone(),
            text: self.text.clone(),
            rating: self.rating,
            user_id: self.user_id.clone(),
            place_id: self.place_id.clone(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }

    pub fn details(&self, author: &User, place: &Place) -> ReviewDetails {
        ReviewDetails {
            id: self.id.clone(),
            text: self.text.clone(),
            rating: self.rating,
            author: author.view(),
            place: place.view(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
        }
    }
}

impl Entity for Review {
    type Id = ReviewId;

    const KIND: &'static str = "review";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Record for Review {
    type Patch = ReviewPatch;

    fn apply_patch(&mut self, patch: &ReviewPatch) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(value) = &patch.text {
            next.set_text(value)?;
        }
        if let Some(value) = patch.rating {
            next.set_rating(value)?;
        }
        if let Some(user_id) = &patch.user_id {
            next.set_author(user_id.clone());
        }
        if let Some(place_id) = &patch.place_id {
            next.set_place(place_id.clone());
        }
        *self = next;
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "text" => Some(self.text.clone().into()),
            "rating" => Some(self.rating.into()),
            "user_id" => Some(self.user_id.to_string().into()),
            "place_id" => Some(self.place_id.to_string().into()),
            _ => base_attribute(self, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: ReviewId,
    pub text: String,
    pub rating: u8,
    pub user_id: UserId,
    pub place_id: PlaceId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review with its author and place embedded (flat views, no further nesting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDetails {
    pub id: ReviewId,
    pub text: String,
    pub rating: u8,
    pub author: UserView,
    pub place: PlaceView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodgebase_core::DomainError;
    use proptest::prelude::*;

    fn great() -> NewReview {
        NewReview {
            text: "Great".to_string(),
            rating: 5,
            user_id: UserId::from("u-1"),
            place_id: PlaceId::from("p-1"),
        }
    }

    fn expect_validation<T: core::fmt::Debug>(result: DomainResult<T>, expected_field: &str) {
        match result {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected Validation error on {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn create_review() {
        let review = Review::new(great()).unwrap();
        assert_eq!(review.text(), "Great");
        assert_eq!(review.rating(), 5);
        assert_eq!(review.user_id(), &UserId::from("u-1"));
        assert_eq!(review.place_id(), &PlaceId::from("p-1"));
    }

    #[test]
    fn create_review_rejects_invalid_fields() {
        let cases: [(fn(&mut NewReview), &str); 4] = [
            (|input| input.rating = 6, "rating"),
            (|input| input.rating = 0, "rating"),
            (|input| input.text = " ".to_string(), "text"),
            (|input| input.text = "t".repeat(TEXT_MAX_LEN + 1), "text"),
        ];
        for (corrupt, field) in cases {
            let mut input = great();
            corrupt(&mut input);
            expect_validation(Review::new(input), field);
        }
    }

    #[test]
    fn fractional_ratings_are_rejected_at_intake() {
        let result: DomainResult<NewReview> = lodgebase_core::from_attributes(serde_json::json!({
            "text": "Nice",
            "rating": 4.5,
            "user_id": "u-1",
            "place_id": "p-1",
        }));
        expect_validation(result, "payload");
    }

    #[test]
    fn patch_is_atomic() {
        let mut review = Review::new(great()).unwrap();
        let before = review.clone();
        let patch = ReviewPatch {
            text: Some("Fine".to_string()),
            rating: Some(9),
            place_id: Some(PlaceId::from("p-2")),
            ..ReviewPatch::default()
        };
        expect_validation(review.apply_patch(&patch), "rating");
        assert_eq!(review, before);
    }

    #[test]
    fn patch_moves_review_to_another_place() {
        let mut review = Review::new(great()).unwrap();
        let patch = ReviewPatch {
            place_id: Some(PlaceId::from("p-2")),
            ..ReviewPatch::default()
        };
        review.apply_patch(&patch).unwrap();
        assert_eq!(review.place_id(), &PlaceId::from("p-2"));
        assert_eq!(review.text(), "Great");
        assert_eq!(review.attribute("place_id"), Some(serde_json::json!("p-2")));
    }

    proptest! {
        /// Property: ratings inside 1..=5 are kept, everything else is rejected.
        #[test]
        fn rating_bounds(rating in -100i64..100) {
            let result = Review::new(NewReview { rating, ..great() });
            if (RATING_MIN..=RATING_MAX).contains(&rating) {
                prop_assert_eq!(i64::from(result.unwrap().rating()), rating);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
