//! Contact enquiries
//!
//! Enquiries are not stored; each accepted one is written to the log for
//! the operator to follow up.

use serde::Deserialize;

use super::ContentError;

pub const ENQUIRY_RECEIVED: &str =
    "Your enquiry has been received. We will get back to you within 24 hours.";

const REQUIRED_FIELDS: &str = "Name, email, and message are required";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactEnquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub message: String,
}

impl ContactEnquiry {
    pub fn validate(&self) -> Result<(), ContentError> {
        let missing = [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty());
        if missing || !self.email.contains('@') {
            return Err(ContentError::validation(REQUIRED_FIELDS));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ContactService;

impl ContactService {
    pub fn new() -> Self {
        Self
    }

    pub fn submit(&self, enquiry: &ContactEnquiry) -> Result<&'static str, ContentError> {
        enquiry.validate()?;

        tracing::info!(
            name = %enquiry.name.trim(),
            email = %enquiry.email.trim(),
            phone = enquiry.phone.as_deref().unwrap_or(""),
            service_type = enquiry.service_type.as_deref().unwrap_or(""),
            message = %enquiry.message.trim(),
            "Contact enquiry received"
        );
        Ok(ENQUIRY_RECEIVED)
    }
}
