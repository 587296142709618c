//! Listings domain module: places, the amenities they offer and the reviews
//! guests leave on them.
//!
//! Entities here hold relations by id only (owner, amenities, author, place).
//! Resolving those ids against other repositories is the facade's job; this
//! crate only guarantees that each record is valid on its own.

pub mod amenity;
pub mod place;
pub mod review;

pub use amenity::{Amenity, AmenityPatch, AmenityView, NewAmenity};
pub use place::{NewPlace, Place, PlaceDetails, PlacePatch, PlaceView};
pub use review::{NewReview, Review, ReviewDetails, ReviewPatch, ReviewView};
