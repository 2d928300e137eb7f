//! Tour model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentStatus;

/// Tour category shown as a badge and used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourCategory {
    Adventure,
    Luxury,
    Cultural,
    Beach,
    Safari,
    City,
}

impl TourCategory {
    pub const ALL: [TourCategory; 6] = [
        Self::Adventure,
        Self::Luxury,
        Self::Cultural,
        Self::Beach,
        Self::Safari,
        Self::City,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Luxury => "luxury",
            Self::Cultural => "cultural",
            Self::Beach => "beach",
            Self::Safari => "safari",
            Self::City => "city",
        }
    }
}

impl std::fmt::Display for TourCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TourCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid tour category: {}", s))
    }
}

/// Tour package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub destination: String,
    /// Free text, e.g. "5 Days / 4 Nights"
    pub duration: String,
    pub price_from: i64,
    pub category: TourCategory,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub images: Vec<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    /// Build an unsaved record from an already-parsed category.
    pub fn from_input(input: CreateTourInput, category: TourCategory) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: input.title.trim().to_string(),
            slug: input.slug.trim().to_string(),
            description: input.description.trim().to_string(),
            destination: input.destination.trim().to_string(),
            duration: input.duration.trim().to_string(),
            price_from: input.price_from,
            category,
            inclusions: input.inclusions,
            exclusions: input.exclusions,
            images: input.images,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlay the supplied fields of an edit onto this record.
    ///
    /// `category` is passed separately because the raw input carries text.
    pub fn apply(&mut self, input: UpdateTourInput, category: Option<TourCategory>) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(slug) = input.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description.trim().to_string();
        }
        if let Some(destination) = input.destination {
            self.destination = destination.trim().to_string();
        }
        if let Some(duration) = input.duration {
            self.duration = duration.trim().to_string();
        }
        if let Some(price) = input.price_from {
            self.price_from = price;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(inclusions) = input.inclusions {
            self.inclusions = inclusions;
        }
        if let Some(exclusions) = input.exclusions {
            self.exclusions = exclusions;
        }
        if let Some(images) = input.images {
            self.images = images;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
    }
}

/// Input for creating a tour
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTourInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub destination: String,
    pub duration: String,
    #[serde(alias = "priceFrom")]
    pub price_from: i64,
    #[serde(alias = "tag")]
    pub category: String,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub images: Vec<String>,
    pub status: ContentStatus,
}

/// Input for updating a tour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTourInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub duration: Option<String>,
    #[serde(alias = "priceFrom")]
    pub price_from: Option<i64>,
    #[serde(alias = "tag")]
    pub category: Option<String>,
    pub inclusions: Option<Vec<String>>,
    pub exclusions: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<ContentStatus>,
}
