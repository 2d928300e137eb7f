//! Shortlet model (short-stay apartments)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentStatus;

/// Short-stay apartment listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortlet {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    /// Whole currency units
    pub price_per_night: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shortlet {
    /// Build an unsaved record; `id` and timestamps are assigned by the store.
    pub fn from_input(input: CreateShortletInput) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: input.title.trim().to_string(),
            slug: input.slug.trim().to_string(),
            description: input.description.trim().to_string(),
            location: input.location.trim().to_string(),
            price_per_night: input.price_per_night,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            max_guests: input.max_guests,
            amenities: input.amenities,
            images: input.images,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlay the supplied fields of an edit onto this record.
    pub fn apply(&mut self, input: UpdateShortletInput) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = input.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description.trim().to_string();
        }
        if let Some(location) = input.location {
            self.location = location.trim().to_string();
        }
        if let Some(price) = input.price_per_night {
            self.price_per_night = price;
        }
        if let Some(bedrooms) = input.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = input.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(max_guests) = input.max_guests {
            self.max_guests = max_guests;
        }
        if let Some(amenities) = input.amenities {
            self.amenities = amenities;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
    }
}

/// Input for creating a shortlet
///
/// Missing fields deserialize to empty values so validation, not the JSON
/// decoder, reports what is wrong.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateShortletInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub price_per_night: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub max_guests: i64,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: ContentStatus,
}

/// Input for updating a shortlet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShortletInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub max_guests: Option<i64>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<ContentStatus>,
}
