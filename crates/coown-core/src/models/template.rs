//! Agreement template domain model.
//!
//! Templates hold the legal text investors sign. Every body of text is
//! stored next to its SHA-256 digest so that any change made outside the
//! store (a direct database edit, a botched migration) is detectable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoownError;

/// The closed set of legal documents tracked by the template store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    CoOwnership,
    PowerOfAttorney,
    JopDeclaration,
}

impl TemplateType {
    pub const ALL: [TemplateType; 3] = [
        TemplateType::CoOwnership,
        TemplateType::PowerOfAttorney,
        TemplateType::JopDeclaration,
    ];

    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::CoOwnership => "co_ownership",
            TemplateType::PowerOfAttorney => "power_of_attorney",
            TemplateType::JopDeclaration => "jop_declaration",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = CoownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "co_ownership" => Ok(TemplateType::CoOwnership),
            "power_of_attorney" => Ok(TemplateType::PowerOfAttorney),
            "jop_declaration" => Ok(TemplateType::JopDeclaration),
            other => Err(CoownError::validation(format!(
                "unknown template type: {other}"
            ))),
        }
    }
}

/// Language of a template body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Arabic,
}

/// A versioned legal agreement template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgreementTemplate {
    pub id: Uuid,
    pub template_type: TemplateType,
    /// Display label (e.g., `Co-Ownership Agreement`).
    pub name: String,
    /// English body, including `{PLACEHOLDER}` tokens.
    pub content: String,
    /// Arabic body, if one has been provided.
    pub content_arabic: Option<String>,
    /// Hex SHA-256 of `content`.
    pub content_hash: String,
    /// Hex SHA-256 of `content_arabic`; present exactly when it is.
    pub content_hash_arabic: Option<String>,
    /// Starts at 1 and grows by one per content-changing edit.
    pub version: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgreementTemplate {
    /// Body stored for the given language.
    pub fn content_for(&self, language: Language) -> Option<&str> {
        match language {
            Language::English => Some(self.content.as_str()),
            Language::Arabic => self.content_arabic.as_deref(),
        }
    }

    /// Digest stored for the given language.
    pub fn hash_for(&self, language: Language) -> Option<&str> {
        match language {
            Language::English => Some(self.content_hash.as_str()),
            Language::Arabic => self.content_hash_arabic.as_deref(),
        }
    }
}

/// Fields required to create a new template. Hashes are computed by the
/// store, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgreementTemplate {
    pub template_type: TemplateType,
    pub name: String,
    pub content: String,
    pub content_arabic: Option<String>,
    pub is_active: bool,
}

/// A content edit for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditTemplateContent {
    #[serde(default)]
    pub language: Language,
    pub content: String,
}

/// Result of an edit: the record as stored after the call, and whether the
/// call produced a new version.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub template: AgreementTemplate,
    pub changed: bool,
}
