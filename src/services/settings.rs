//! Settings service
//!
//! Site settings are a singleton stored as key/value rows. Keys missing
//! from the store fall back to the launch defaults.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{keys as cache_keys, Generation, MemoryCache};
use crate::db::repositories::SettingsRepository;

use super::validation::require_text;
use super::ContentError;

/// Known setting keys
pub mod keys {
    pub const SITE_NAME: &str = "site_name";
    pub const SITE_TAGLINE: &str = "site_tagline";
    pub const SITE_DESCRIPTION: &str = "site_description";
    pub const CONTACT_EMAIL: &str = "contact_email";
    pub const CONTACT_PHONE: &str = "contact_phone";
    pub const WHATSAPP_NUMBER: &str = "whatsapp_number";
    pub const ADDRESS: &str = "address";
    pub const FACEBOOK_URL: &str = "facebook_url";
    pub const TWITTER_URL: &str = "twitter_url";
    pub const INSTAGRAM_URL: &str = "instagram_url";
    pub const HERO_TITLE: &str = "hero_title";
    pub const HERO_SUBTITLE: &str = "hero_subtitle";
    pub const ENABLE_BOOKING: &str = "enable_booking";
    pub const ENABLE_SHORTLETS: &str = "enable_shortlets";
    pub const ENABLE_TOURS: &str = "enable_tours";

    pub const ALL: &[&str] = &[
        SITE_NAME,
        SITE_TAGLINE,
        SITE_DESCRIPTION,
        CONTACT_EMAIL,
        CONTACT_PHONE,
        WHATSAPP_NUMBER,
        ADDRESS,
        FACEBOOK_URL,
        TWITTER_URL,
        INSTAGRAM_URL,
        HERO_TITLE,
        HERO_SUBTITLE,
        ENABLE_BOOKING,
        ENABLE_SHORTLETS,
        ENABLE_TOURS,
    ];
}

/// Site-wide settings edited on the CMS settings screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_tagline: String,
    pub site_description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub whatsapp_number: String,
    pub address: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub enable_booking: bool,
    pub enable_shortlets: bool,
    pub enable_tours: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Ontour Travels".to_string(),
            site_tagline: "Your Journey, Our Passion".to_string(),
            site_description: "Luxury travel and accommodation services in Nigeria".to_string(),
            contact_email: "info@ontourtravels.com.ng".to_string(),
            contact_phone: "+234 812 345 6789".to_string(),
            whatsapp_number: "2348123456789".to_string(),
            address: "Lagos, Nigeria".to_string(),
            facebook_url: String::new(),
            twitter_url: String::new(),
            instagram_url: String::new(),
            hero_title: "Explore the World, Stay in Comfort".to_string(),
            hero_subtitle:
                "Luxury short stays and unforgettable journeys — perfectly planned for you."
                    .to_string(),
            enable_booking: true,
            enable_shortlets: true,
            enable_tours: true,
        }
    }
}

impl SiteSettings {
    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| map.get(key).cloned().unwrap_or(default);
        let flag = |key: &str, default: bool| {
            map.get(key)
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(default)
        };

        Self {
            site_name: text(keys::SITE_NAME, defaults.site_name),
            site_tagline: text(keys::SITE_TAGLINE, defaults.site_tagline),
            site_description: text(keys::SITE_DESCRIPTION, defaults.site_description),
            contact_email: text(keys::CONTACT_EMAIL, defaults.contact_email),
            contact_phone: text(keys::CONTACT_PHONE, defaults.contact_phone),
            whatsapp_number: text(keys::WHATSAPP_NUMBER, defaults.whatsapp_number),
            address: text(keys::ADDRESS, defaults.address),
            facebook_url: text(keys::FACEBOOK_URL, defaults.facebook_url),
            twitter_url: text(keys::TWITTER_URL, defaults.twitter_url),
            instagram_url: text(keys::INSTAGRAM_URL, defaults.instagram_url),
            hero_title: text(keys::HERO_TITLE, defaults.hero_title),
            hero_subtitle: text(keys::HERO_SUBTITLE, defaults.hero_subtitle),
            enable_booking: flag(keys::ENABLE_BOOKING, defaults.enable_booking),
            enable_shortlets: flag(keys::ENABLE_SHORTLETS, defaults.enable_shortlets),
            enable_tours: flag(keys::ENABLE_TOURS, defaults.enable_tours),
        }
    }

    fn to_map(&self) -> HashMap<String, String> {
        let pairs = [
            (keys::SITE_NAME, self.site_name.trim().to_string()),
            (keys::SITE_TAGLINE, self.site_tagline.trim().to_string()),
            (keys::SITE_DESCRIPTION, self.site_description.trim().to_string()),
            (keys::CONTACT_EMAIL, self.contact_email.trim().to_string()),
            (keys::CONTACT_PHONE, self.contact_phone.trim().to_string()),
            (keys::WHATSAPP_NUMBER, self.whatsapp_number.trim().to_string()),
            (keys::ADDRESS, self.address.trim().to_string()),
            (keys::FACEBOOK_URL, self.facebook_url.trim().to_string()),
            (keys::TWITTER_URL, self.twitter_url.trim().to_string()),
            (keys::INSTAGRAM_URL, self.instagram_url.trim().to_string()),
            (keys::HERO_TITLE, self.hero_title.trim().to_string()),
            (keys::HERO_SUBTITLE, self.hero_subtitle.trim().to_string()),
            (keys::ENABLE_BOOKING, self.enable_booking.to_string()),
            (keys::ENABLE_SHORTLETS, self.enable_shortlets.to_string()),
            (keys::ENABLE_TOURS, self.enable_tours.to_string()),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn validate(&self) -> Result<(), ContentError> {
        require_text(&self.site_name, "Site name")?;
        require_text(&self.hero_title, "Hero title")?;
        require_text(&self.contact_email, "Contact email")?;
        if !self.contact_email.contains('@') {
            return Err(ContentError::validation("Contact email must be a valid email address"));
        }
        require_text(&self.contact_phone, "Contact phone")?;
        Ok(())
    }
}

pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    cache: Arc<MemoryCache>,
    generation: Generation,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>, cache: Arc<MemoryCache>) -> Self {
        Self {
            repo,
            cache,
            generation: Generation::default(),
        }
    }

    /// Current settings read straight from the store
    pub async fn get_site_settings(&self) -> Result<SiteSettings, ContentError> {
        let stored = self.repo.get_many(keys::ALL).await?;
        Ok(SiteSettings::from_map(&stored))
    }

    /// Settings for the public site, served from cache when warm
    pub async fn get_public_settings(&self) -> Result<SiteSettings, ContentError> {
        if let Ok(Some(cached)) = self.cache.get::<SiteSettings>(cache_keys::SITE_SETTINGS).await {
            return Ok(cached);
        }

        let seen = self.generation.current();
        let settings = self.get_site_settings().await?;
        if let Err(e) = self
            .cache
            .set_unless_changed(cache_keys::SITE_SETTINGS, &settings, &self.generation, seen)
            .await
        {
            tracing::warn!("Failed to cache site settings: {:#}", e);
        }
        Ok(settings)
    }

    /// Replace every setting at once
    pub async fn update_site_settings(&self, settings: &SiteSettings) -> Result<SiteSettings, ContentError> {
        settings.validate()?;
        self.repo.set_many(&settings.to_map()).await?;
        self.generation.bump();
        self.cache.delete(cache_keys::SITE_SETTINGS).await;

        tracing::info!("Site settings updated");
        self.get_site_settings().await
    }
}
