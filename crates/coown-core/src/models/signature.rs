//! Signature tracking models.
//!
//! Only counts are tracked: how many co-owners have signed a given
//! document for a property, and how many signatures it needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::template::TemplateType;

/// Stored signature counts for one document of one property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureRequirement {
    pub id: Uuid,
    pub property_id: Uuid,
    pub template_id: Uuid,
    pub total_required: u32,
    pub signed_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSignatureRequirement {
    pub property_id: Uuid,
    pub template_id: Uuid,
    pub total_required: u32,
}

/// Completion of one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSignatureStatus {
    pub template_id: Uuid,
    pub template_name: String,
    pub document_type: TemplateType,
    pub signed_count: u32,
    pub total_required: u32,
    pub is_complete: bool,
}

impl DocumentSignatureStatus {
    pub fn new(
        template_id: Uuid,
        template_name: String,
        document_type: TemplateType,
        signed_count: u32,
        total_required: u32,
    ) -> Self {
        Self {
            template_id,
            template_name,
            document_type,
            signed_count,
            total_required,
            is_complete: signed_count == total_required,
        }
    }
}

/// Read model: signature completion across every document of a property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertySignatureStatus {
    pub property_id: Uuid,
    pub documents: Vec<DocumentSignatureStatus>,
    pub all_complete: bool,
}

impl PropertySignatureStatus {
    /// Builds the projection. A property with no tracked documents is not
    /// complete: there is nothing to export yet.
    pub fn from_documents(property_id: Uuid, documents: Vec<DocumentSignatureStatus>) -> Self {
        let all_complete = !documents.is_empty() && documents.iter().all(|d| d.is_complete);
        Self {
            property_id,
            documents,
            all_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(signed: u32, total: u32) -> DocumentSignatureStatus {
        DocumentSignatureStatus::new(
            Uuid::new_v4(),
            "Co-Ownership Agreement".into(),
            TemplateType::CoOwnership,
            signed,
            total,
        )
    }

    #[test]
    fn partial_document_blocks_completion() {
        let status =
            PropertySignatureStatus::from_documents(Uuid::new_v4(), vec![doc(3, 4), doc(2, 2)]);
        assert!(!status.documents[0].is_complete);
        assert!(status.documents[1].is_complete);
        assert!(!status.all_complete);
    }

    #[test]
    fn every_document_signed_is_complete() {
        let status = PropertySignatureStatus::from_documents(
            Uuid::new_v4(),
            vec![doc(4, 4), doc(1, 1), doc(4, 4)],
        );
        assert!(status.all_complete);
    }

    #[test]
    fn no_documents_is_not_complete() {
        let status = PropertySignatureStatus::from_documents(Uuid::new_v4(), vec![]);
        assert!(!status.all_complete);
    }
}
