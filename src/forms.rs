//! CMS editor form payloads
//!
//! The editor screens post numbers as text and publish state as an
//! `is_published` toggle. These forms turn that loose shape into the typed
//! create inputs the services accept, applying the same rules the API
//! enforces and filling in a slug from the title when none was typed.

use serde::Deserialize;

use crate::models::{ContentStatus, CreateShortletInput, CreateTourInput, Shortlet};
use crate::services::validation::{require_positive, require_slug, require_text, Validate};
use crate::services::{generate_slug, ContentError};

/// Shortlet editor screen
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShortletForm {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub price_per_night: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub max_guests: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub is_published: bool,
}

impl ShortletForm {
    /// Fields are checked in the editor's order; numbers are parsed only
    /// once every text field before them has passed.
    pub fn validate(&self) -> Result<CreateShortletInput, ContentError> {
        let slug = resolve_slug(&self.slug, &self.title);
        require_text(&self.title, "Title")?;
        require_slug(&slug)?;
        require_text(&self.description, "Description")?;
        require_text(&self.location, "Location")?;

        let price_per_night = parse_number(&self.price_per_night, "Price per night")?;
        require_positive(price_per_night, "Valid price per night is required")?;
        let bedrooms = parse_number(&self.bedrooms, "Bedrooms")?;
        require_positive(bedrooms, "Valid number of bedrooms is required")?;

        let input = CreateShortletInput {
            title: self.title.trim().to_string(),
            slug,
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            price_per_night,
            bedrooms,
            bathrooms: parse_number(&self.bathrooms, "Bathrooms")?,
            max_guests: parse_number(&self.max_guests, "Max guests")?,
            amenities: clean_list(&self.amenities),
            images: clean_list(&self.images),
            status: ContentStatus::from_published(self.is_published),
        };

        Shortlet::from_input(input.clone()).validate()?;
        Ok(input)
    }
}

/// Tour editor screen
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TourForm {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub destination: String,
    pub duration: String,
    pub price_from: String,
    #[serde(alias = "tag")]
    pub category: String,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub images: Vec<String>,
    pub is_published: bool,
}

impl TourForm {
    pub fn validate(&self) -> Result<CreateTourInput, ContentError> {
        let slug = resolve_slug(&self.slug, &self.title);
        require_text(&self.title, "Title")?;
        require_slug(&slug)?;
        require_text(&self.description, "Description")?;
        require_text(&self.destination, "Destination")?;
        require_text(&self.duration, "Duration")?;

        let input = CreateTourInput {
            title: self.title.trim().to_string(),
            slug,
            description: self.description.trim().to_string(),
            destination: self.destination.trim().to_string(),
            duration: self.duration.trim().to_string(),
            price_from: parse_number(&self.price_from, "Price")?,
            category: self.category.trim().to_string(),
            inclusions: clean_list(&self.inclusions),
            exclusions: clean_list(&self.exclusions),
            images: clean_list(&self.images),
            status: ContentStatus::from_published(self.is_published),
        };

        input.validate()?;
        Ok(input)
    }
}

fn resolve_slug(slug: &str, title: &str) -> String {
    let slug = slug.trim();
    if slug.is_empty() {
        generate_slug(title)
    } else {
        slug.to_string()
    }
}

/// Blank fields read as zero and are rejected later by the range checks.
fn parse_number(raw: &str, label: &str) -> Result<i64, ContentError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| ContentError::validation(format!("{} must be a whole number", label)))
}

/// Entries are trimmed and blanks dropped; order and duplicates are kept.
fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
