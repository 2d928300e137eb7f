//! Services layer
//!
//! Business rules for the content collections. Services validate every
//! write before it reaches a repository and keep the public read cache in
//! step with the store.

pub mod blob_store;
pub mod contact;
pub mod error;
pub mod media;
pub mod password;
pub mod session;
pub mod settings;
pub mod shortlet;
pub mod slug;
pub mod tour;
pub mod validation;

pub use blob_store::{BlobStore, LocalBlobStore};
pub use contact::{ContactEnquiry, ContactService};
pub use error::ContentError;
pub use media::{MediaService, UploadFile, UploadOutcome};
pub use password::{hash_password, verify_password};
pub use session::{PresenceVerifier, SessionError, SessionGate, SessionState, TokenVerifier, SESSION_COOKIE};
pub use settings::{SettingsService, SiteSettings};
pub use shortlet::ShortletService;
pub use slug::generate_slug;
pub use tour::TourService;
pub use validation::Validate;
