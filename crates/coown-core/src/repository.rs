//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations own hashing and
//! versioning so that callers can never persist a body without its digest.

use uuid::Uuid;

use crate::error::CoownResult;
use crate::models::{
    signature::{CreateSignatureRequirement, SignatureRequirement},
    template::{
        AgreementTemplate, CreateAgreementTemplate, EditOutcome, EditTemplateContent,
        TemplateType,
    },
};

// ---------------------------------------------------------------------------
// Agreement templates
// ---------------------------------------------------------------------------

pub trait TemplateRepository: Send + Sync {
    /// Insert a template at version 1 with hashes computed from its content.
    fn create(
        &self,
        input: CreateAgreementTemplate,
    ) -> impl Future<Output = CoownResult<AgreementTemplate>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoownResult<AgreementTemplate>> + Send;
    /// Every template, ordered by type then name.
    fn list_all(&self) -> impl Future<Output = CoownResult<Vec<AgreementTemplate>>> + Send;
    /// Active templates, optionally restricted to one type.
    fn list_active(
        &self,
        template_type: Option<TemplateType>,
    ) -> impl Future<Output = CoownResult<Vec<AgreementTemplate>>> + Send;
    /// Replace one language's body, its hash and bump the version in a
    /// single write. Identical content leaves the record untouched.
    fn update_content(
        &self,
        id: Uuid,
        input: EditTemplateContent,
    ) -> impl Future<Output = CoownResult<EditOutcome>> + Send;
    /// Make `id` the only active template of its type.
    fn set_active(&self, id: Uuid) -> impl Future<Output = CoownResult<AgreementTemplate>> + Send;
    fn count(&self) -> impl Future<Output = CoownResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Signature tracking
// ---------------------------------------------------------------------------

pub trait SignatureRepository: Send + Sync {
    fn create_requirement(
        &self,
        input: CreateSignatureRequirement,
    ) -> impl Future<Output = CoownResult<SignatureRequirement>> + Send;
    /// Count one more signature, refusing once `total_required` is reached.
    fn record_signature(
        &self,
        property_id: Uuid,
        template_id: Uuid,
    ) -> impl Future<Output = CoownResult<SignatureRequirement>> + Send;
    fn list_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = CoownResult<Vec<SignatureRequirement>>> + Send;
}
