//! Publish state shared by shortlets and tours

use serde::{Deserialize, Serialize};

/// Publish gate for public visibility.
///
/// Editor screens present this as an `is_published` toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Visible on the public site
    Active,
    /// Draft, visible only in the CMS
    #[default]
    Inactive,
}

impl ContentStatus {
    pub fn from_published(is_published: bool) -> Self {
        if is_published {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub fn is_published(self) -> bool {
        self == Self::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(anyhow::anyhow!("Invalid status: {}", s)),
        }
    }
}
