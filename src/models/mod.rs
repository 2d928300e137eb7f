//! Data models
//!
//! Records of the content store (Shortlet, Tour, Media) and the inputs the
//! CRUD API accepts for them. Site settings live with their service.

mod media;
mod shortlet;
mod status;
mod tour;

pub use media::{Media, UpdateMediaInput};
pub use shortlet::{CreateShortletInput, Shortlet, UpdateShortletInput};
pub use status::ContentStatus;
pub use tour::{CreateTourInput, Tour, TourCategory, UpdateTourInput};
