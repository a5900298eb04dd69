//! Signature tracking and the DLD export gate.

use std::collections::HashMap;

use coown_core::error::{CoownError, CoownResult};
use coown_core::integrity::check_template;
use coown_core::models::signature::{
    CreateSignatureRequirement, DocumentSignatureStatus, PropertySignatureStatus,
    SignatureRequirement,
};
use coown_core::models::template::AgreementTemplate;
use coown_core::repository::{SignatureRepository, TemplateRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AgreementConfig;
use crate::error::AgreementError;

/// Whether a property's document pack may be submitted to the Dubai Land
/// Department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportReadiness {
    pub property_id: Uuid,
    pub all_signed: bool,
    pub templates_intact: bool,
    pub ready: bool,
    /// One entry per reason the export is blocked; empty when `ready`.
    pub blocking: Vec<String>,
}

/// Signature tracking service.
pub struct SignatureService<T: TemplateRepository, S: SignatureRepository> {
    template_repo: T,
    signature_repo: S,
    config: AgreementConfig,
}

impl<T: TemplateRepository, S: SignatureRepository> SignatureService<T, S> {
    pub fn new(template_repo: T, signature_repo: S, config: AgreementConfig) -> Self {
        Self {
            template_repo,
            signature_repo,
            config,
        }
    }

    /// Start tracking signatures for one document of a property.
    pub async fn register_requirement(
        &self,
        input: CreateSignatureRequirement,
    ) -> CoownResult<SignatureRequirement> {
        if input.total_required > self.config.max_required_signatures {
            return Err(AgreementError::TooManySignatures {
                requested: input.total_required,
                max: self.config.max_required_signatures,
            }
            .into());
        }
        self.signature_repo.create_requirement(input).await
    }

    pub async fn record_signature(
        &self,
        property_id: Uuid,
        template_id: Uuid,
    ) -> CoownResult<SignatureRequirement> {
        self.signature_repo
            .record_signature(property_id, template_id)
            .await
    }

    /// Completion of every tracked document of a property, labelled with
    /// the template name and type.
    pub async fn property_status(&self, property_id: Uuid) -> CoownResult<PropertySignatureStatus> {
        let (status, _) = self.status_with_templates(property_id).await?;
        Ok(status)
    }

    /// Export is allowed once every document is fully signed and every
    /// template the documents were produced from still verifies.
    pub async fn export_readiness(&self, property_id: Uuid) -> CoownResult<ExportReadiness> {
        let (status, templates) = self.status_with_templates(property_id).await?;
        let mut blocking = Vec::new();

        if status.documents.is_empty() {
            blocking.push("no documents registered for signature".to_string());
        }
        for doc in status.documents.iter().filter(|d| !d.is_complete) {
            blocking.push(format!(
                "{}: {} of {} signatures collected",
                doc.template_name, doc.signed_count, doc.total_required
            ));
        }

        let mut templates_intact = true;
        for doc in &status.documents {
            let Some(template) = templates.get(&doc.template_id) else {
                continue;
            };
            if let Some(reason) = check_template(template).mismatch_reason() {
                warn!(
                    %property_id,
                    template_id = %template.id,
                    %reason,
                    "export blocked by template integrity failure"
                );
                templates_intact = false;
                blocking.push(format!("{}: {reason}", template.name));
            }
        }

        let ready = status.all_complete && templates_intact;
        if ready {
            info!(%property_id, "property ready for DLD export");
        }

        Ok(ExportReadiness {
            property_id,
            all_signed: status.all_complete,
            templates_intact,
            ready,
            blocking,
        })
    }

    async fn status_with_templates(
        &self,
        property_id: Uuid,
    ) -> CoownResult<(PropertySignatureStatus, HashMap<Uuid, AgreementTemplate>)> {
        let requirements = self.signature_repo.list_by_property(property_id).await?;
        let templates: HashMap<Uuid, AgreementTemplate> = self
            .template_repo
            .list_all()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let documents = requirements
            .iter()
            .map(|req| {
                // Templates are never deleted, so a dangling reference means
                // the store was modified outside this service.
                let template = templates.get(&req.template_id).ok_or_else(|| {
                    CoownError::Internal(format!(
                        "signature requirement {} references missing template {}",
                        req.id, req.template_id
                    ))
                })?;
                Ok(DocumentSignatureStatus::new(
                    template.id,
                    template.name.clone(),
                    template.template_type,
                    req.signed_count,
                    req.total_required,
                ))
            })
            .collect::<CoownResult<Vec<_>>>()?;

        Ok((
            PropertySignatureStatus::from_documents(property_id, documents),
            templates,
        ))
    }
}
