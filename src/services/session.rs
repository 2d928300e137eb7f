//! Admin session gate
//!
//! A request is `Authenticated` when it carries a token the configured
//! [`TokenVerifier`] accepts. The shipped [`PresenceVerifier`] only checks
//! that a token is present: issued tokens are not recorded, so anything
//! non-empty passes. Swap the verifier to check tokens against an identity
//! provider.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;

use super::password::verify_password;

/// Cookie carrying the admin token for page requests
pub const SESSION_COOKIE: &str = "admin_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}

/// Accepts any non-blank token
#[derive(Debug, Default, Clone, Copy)]
pub struct PresenceVerifier;

#[async_trait]
impl TokenVerifier for PresenceVerifier {
    async fn verify(&self, token: &str) -> bool {
        !token.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Admin login is not configured")]
    NotConfigured,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub struct SessionGate {
    verifier: Arc<dyn TokenVerifier>,
    auth: AuthConfig,
}

impl SessionGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, auth: AuthConfig) -> Self {
        Self { verifier, auth }
    }

    pub async fn resolve(&self, token: Option<&str>) -> SessionState {
        match token {
            Some(token) if self.verifier.verify(token).await => SessionState::Authenticated,
            _ => SessionState::Anonymous,
        }
    }

    /// Check the admin credentials and hand out a fresh token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, SessionError> {
        if !self.auth.is_configured() {
            return Err(SessionError::NotConfigured);
        }

        let email_matches = email.trim().eq_ignore_ascii_case(self.auth.admin_email.trim());
        // Checked even when the email differs.
        let password_matches = verify_password(password, &self.auth.admin_password_hash)?;
        if !(email_matches && password_matches) {
            tracing::warn!(email = %email.trim(), "Rejected admin login");
            return Err(SessionError::InvalidCredentials);
        }

        tracing::info!(email = %email.trim(), "Admin logged in");
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::hash_password;

    fn gate(auth: AuthConfig) -> SessionGate {
        SessionGate::new(Arc::new(PresenceVerifier), auth)
    }

    fn configured() -> AuthConfig {
        AuthConfig {
            admin_email: "admin@ontourtravels.com.ng".to_string(),
            admin_password_hash: hash_password("correct horse").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_resolve_by_token_presence() {
        let gate = gate(AuthConfig::default());
        assert_eq!(gate.resolve(None).await, SessionState::Anonymous);
        assert_eq!(gate.resolve(Some("")).await, SessionState::Anonymous);
        assert_eq!(gate.resolve(Some("  ")).await, SessionState::Anonymous);
        assert_eq!(gate.resolve(Some("anything")).await, SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_custom_verifier_is_consulted() {
        struct Fixed;

        #[async_trait]
        impl TokenVerifier for Fixed {
            async fn verify(&self, token: &str) -> bool {
                token == "good"
            }
        }

        let gate = SessionGate::new(Arc::new(Fixed), AuthConfig::default());
        assert_eq!(gate.resolve(Some("good")).await, SessionState::Authenticated);
        assert_eq!(gate.resolve(Some("bad")).await, SessionState::Anonymous);
    }

    #[test]
    fn test_login_requires_configuration() {
        let result = gate(AuthConfig::default()).login("admin@ontourtravels.com.ng", "x");
        assert!(matches!(result, Err(SessionError::NotConfigured)));
    }

    #[test]
    fn test_login_checks_both_credentials() {
        let gate = gate(configured());

        let token = gate.login(" Admin@OntourTravels.com.ng ", "correct horse").unwrap();
        assert!(Uuid::parse_str(&token).is_ok());

        assert!(matches!(
            gate.login("admin@ontourtravels.com.ng", "wrong"),
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            gate.login("someone@else.com", "correct horse"),
            Err(SessionError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_with_malformed_hash_is_internal() {
        let gate = gate(AuthConfig {
            admin_email: "admin@ontourtravels.com.ng".to_string(),
            admin_password_hash: "not-a-phc-string".to_string(),
        });
        assert!(matches!(
            gate.login("admin@ontourtravels.com.ng", "x"),
            Err(SessionError::Internal(_))
        ));
    }
}
