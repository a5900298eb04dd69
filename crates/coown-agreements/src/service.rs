//! Template service: editing, activation and tamper detection.

use coown_core::error::CoownResult;
use coown_core::integrity::{IntegrityReport, check_template};
use coown_core::models::template::{AgreementTemplate, EditTemplateContent, TemplateType};
use coown_core::repository::TemplateRepository;
use tracing::warn;
use uuid::Uuid;

use crate::config::AgreementConfig;
use crate::error::AgreementError;

/// Agreement template service.
///
/// Generic over the repository so that the service layer has no
/// dependency on the database crate.
pub struct TemplateService<R: TemplateRepository> {
    repo: R,
    config: AgreementConfig,
}

impl<R: TemplateRepository> TemplateService<R> {
    pub fn new(repo: R, config: AgreementConfig) -> Self {
        Self { repo, config }
    }

    /// Every template with its content, for the admin preview.
    pub async fn list_all(&self) -> CoownResult<Vec<AgreementTemplate>> {
        let templates = self.repo.list_all().await?;
        warn_on_mismatch(&templates);
        Ok(templates)
    }

    /// Active templates, optionally of one type. Tampered records are
    /// still returned but logged.
    pub async fn list_active(
        &self,
        template_type: Option<TemplateType>,
    ) -> CoownResult<Vec<AgreementTemplate>> {
        let templates = self.repo.list_active(template_type).await?;
        warn_on_mismatch(&templates);
        Ok(templates)
    }

    pub async fn get(&self, id: Uuid) -> CoownResult<AgreementTemplate> {
        let template = self.repo.get_by_id(id).await?;
        warn_on_mismatch(std::slice::from_ref(&template));
        Ok(template)
    }

    /// Replace one language's body. Identical content is a no-op and
    /// returns the stored record unchanged.
    pub async fn edit_content(
        &self,
        id: Uuid,
        input: EditTemplateContent,
    ) -> CoownResult<AgreementTemplate> {
        // 1. Validate before touching the store.
        if input.content.trim().is_empty() {
            return Err(AgreementError::EmptyContent.into());
        }
        let len = input.content.len();
        if len > self.config.max_content_bytes {
            return Err(AgreementError::ContentTooLong {
                len,
                max: self.config.max_content_bytes,
            }
            .into());
        }

        // 2. Single atomic write of body, digest and version.
        let outcome = self.repo.update_content(id, input).await?;
        Ok(outcome.template)
    }

    /// Make `id` the only active template of its type.
    pub async fn activate(&self, id: Uuid) -> CoownResult<AgreementTemplate> {
        self.repo.set_active(id).await
    }

    /// Verify every stored template and flag types with more than one
    /// active template.
    pub async fn integrity_report(&self) -> CoownResult<IntegrityReport> {
        let templates = self.repo.list_all().await?;
        let report = IntegrityReport::build(&templates);

        for failure in report.failures() {
            let reason = failure.mismatch_reason().unwrap_or_default();
            warn!(
                template_id = %failure.template_id,
                template_type = %failure.template_type,
                version = failure.version,
                %reason,
                "template integrity check failed"
            );
        }
        for ty in &report.multiple_active {
            warn!(template_type = %ty, "more than one active template");
        }
        Ok(report)
    }

    /// The template, or an integrity error if its content no longer
    /// matches its stored digest.
    pub async fn ensure_intact(&self, id: Uuid) -> CoownResult<AgreementTemplate> {
        let template = self.repo.get_by_id(id).await?;
        match check_template(&template).mismatch_reason() {
            None => Ok(template),
            Some(reason) => {
                warn!(template_id = %id, %reason, "template integrity check failed");
                Err(AgreementError::IntegrityMismatch {
                    template_id: id,
                    reason,
                }
                .into())
            }
        }
    }
}

fn warn_on_mismatch(templates: &[AgreementTemplate]) {
    for template in templates {
        if let Some(reason) = check_template(template).mismatch_reason() {
            warn!(
                template_id = %template.id,
                template_type = %template.template_type,
                version = template.version,
                %reason,
                "template integrity check failed"
            );
        }
    }
}
