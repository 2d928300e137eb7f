//! Ontour - content backend for the Ontour Travels website
//!
//! Public read API for shortlets, tours and site settings, an admin CMS API
//! for editing them, and a session gate in front of the admin pages.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
