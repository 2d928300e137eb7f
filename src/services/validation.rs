//! Write-path validation
//!
//! Checks run field by field in editor order and stop at the first failure,
//! so the caller always sees exactly one message.

use super::slug::is_valid_slug;
use super::ContentError;
use crate::models::{CreateTourInput, Shortlet, Tour, TourCategory};

/// Record-level validation run before any repository write
pub trait Validate {
    fn validate(&self) -> Result<(), ContentError>;
}

pub fn require_text(value: &str, label: &str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::validation(format!("{} is required", label)));
    }
    Ok(())
}

pub fn require_slug(slug: &str) -> Result<(), ContentError> {
    require_text(slug, "Slug")?;
    if !is_valid_slug(slug.trim()) {
        return Err(ContentError::validation(
            "Slug may only contain lowercase letters, digits and single hyphens",
        ));
    }
    Ok(())
}

/// `message` is reported as-is when `value` is zero or negative.
pub fn require_positive(value: i64, message: &str) -> Result<(), ContentError> {
    if value <= 0 {
        return Err(ContentError::validation(message));
    }
    Ok(())
}

pub fn require_non_negative(value: i64, label: &str) -> Result<(), ContentError> {
    if value < 0 {
        return Err(ContentError::validation(format!("{} cannot be negative", label)));
    }
    Ok(())
}

pub fn parse_category(raw: &str) -> Result<TourCategory, ContentError> {
    require_text(raw, "Tag/Category")?;
    raw.parse()
        .map_err(|_| ContentError::validation(format!("Unknown tour category: {}", raw.trim())))
}

impl Validate for Shortlet {
    fn validate(&self) -> Result<(), ContentError> {
        require_text(&self.title, "Title")?;
        require_slug(&self.slug)?;
        require_text(&self.description, "Description")?;
        require_text(&self.location, "Location")?;
        require_positive(self.price_per_night, "Valid price per night is required")?;
        require_positive(self.bedrooms, "Valid number of bedrooms is required")?;
        require_non_negative(self.bathrooms, "Bathrooms")?;
        require_non_negative(self.max_guests, "Max guests")?;
        Ok(())
    }
}

fn validate_tour_fields(
    title: &str,
    slug: &str,
    description: &str,
    destination: &str,
    duration: &str,
    price_from: i64,
) -> Result<(), ContentError> {
    require_text(title, "Title")?;
    require_slug(slug)?;
    require_text(description, "Description")?;
    require_text(destination, "Destination")?;
    require_text(duration, "Duration")?;
    require_positive(price_from, "Valid price is required")?;
    Ok(())
}

impl Validate for Tour {
    fn validate(&self) -> Result<(), ContentError> {
        validate_tour_fields(
            &self.title,
            &self.slug,
            &self.description,
            &self.destination,
            &self.duration,
            self.price_from,
        )
    }
}

/// Tours are checked on the raw input so an unknown category is reported
/// after the text fields, in editor order.
impl Validate for CreateTourInput {
    fn validate(&self) -> Result<(), ContentError> {
        validate_tour_fields(
            &self.title,
            &self.slug,
            &self.description,
            &self.destination,
            &self.duration,
            self.price_from,
        )?;
        parse_category(&self.category)?;
        Ok(())
    }
}
