//! Demo data for a fresh facade: one host, a guest, two amenities, a listed
//! place and a review of it.

use anyhow::Context;

use lodgebase_core::{Entity, PlaceId, ReviewId, UserId};
use lodgebase_infra::Facade;
use lodgebase_listings::{NewAmenity, NewPlace, NewReview};
use lodgebase_users::NewUser;

/// Ids of what [`seed`] created.
#[derive(Debug, Clone)]
pub struct Seeded {
    pub host_id: UserId,
    pub guest_id: UserId,
    pub place_id: PlaceId,
    pub review_id: ReviewId,
}

pub fn seed(facade: &Facade) -> anyhow::Result<Seeded> {
    let host = facade
        .create_user(NewUser {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret123".to_string(),
            is_admin: false,
        })
        .context("failed to create host")?;
    let guest = facade
        .create_user(NewUser {
            first_name: "Ben".to_string(),
            last_name: "Okafor".to_string(),
            email: "ben@example.com".to_string(),
            password: "hunter22".to_string(),
            is_admin: false,
        })
        .context("failed to create guest")?;

    let amenities = ["Wifi", "Kitchen"]
        .into_iter()
        .map(|name| {
            facade
                .create_amenity(NewAmenity {
                    name: name.to_string(),
                })
                .map(|amenity| amenity.id().clone())
                .with_context(|| format!("failed to create amenity `{name}`"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let place = facade
        .create_place(NewPlace {
            title: "Loft".to_string(),
            description: Some("Sunny loft near the river".to_string()),
            price: 100.0,
            latitude: 40.0,
            longitude: -73.0,
            owner_id: host.id().clone(),
            amenities,
        })
        .context("failed to create place")?;
    tracing::info!(place_id = %place.id(), "place listed");

    let review = facade
        .create_review(NewReview {
            text: "Great".to_string(),
            rating: 5,
            user_id: guest.id().clone(),
            place_id: place.id().clone(),
        })
        .context("failed to create review")?;

    Ok(Seeded {
        host_id: host.id().clone(),
        guest_id: guest.id().clone(),
        place_id: place.id().clone(),
        review_id: review.id().clone(),
    })
}
