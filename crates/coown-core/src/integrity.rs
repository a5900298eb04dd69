//! Content hashing and tamper detection for agreement templates.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::template::{AgreementTemplate, Language, TemplateType};

/// Hex-encoded SHA-256 of the exact UTF-8 bytes of `content`.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// `true` when every stored body matches its stored digest.
///
/// A template carrying an Arabic digest without Arabic content (or the
/// reverse) fails verification.
pub fn verify_template(template: &AgreementTemplate) -> bool {
    check_template(template).is_intact()
}

/// Per-language verification result for one template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateIntegrity {
    pub template_id: Uuid,
    pub template_type: TemplateType,
    pub version: u32,
    pub english_ok: bool,
    pub arabic_ok: bool,
}

impl TemplateIntegrity {
    pub fn is_intact(&self) -> bool {
        self.english_ok && self.arabic_ok
    }

    /// Human-readable description of what failed, if anything.
    pub fn mismatch_reason(&self) -> Option<String> {
        match (self.english_ok, self.arabic_ok) {
            (true, true) => None,
            (false, true) => Some("English content hash mismatch".into()),
            (true, false) => Some("Arabic content hash mismatch".into()),
            (false, false) => Some("English and Arabic content hash mismatch".into()),
        }
    }
}

/// Recompute both digests of a template and compare them with the stored ones.
pub fn check_template(template: &AgreementTemplate) -> TemplateIntegrity {
    TemplateIntegrity {
        template_id: template.id,
        template_type: template.template_type,
        version: template.version,
        english_ok: language_ok(template, Language::English),
        arabic_ok: language_ok(template, Language::Arabic),
    }
}

/// A body and its digest must be present together and agree.
fn language_ok(template: &AgreementTemplate, language: Language) -> bool {
    match (template.content_for(language), template.hash_for(language)) {
        (Some(content), Some(hash)) => content_hash(content) == hash,
        (None, None) => true,
        _ => false,
    }
}

/// Integrity of the whole template store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntegrityReport {
    pub templates: Vec<TemplateIntegrity>,
    /// Template types with more than one active template.
    pub multiple_active: Vec<TemplateType>,
    pub is_intact: bool,
}

impl IntegrityReport {
    pub fn build(templates: &[AgreementTemplate]) -> Self {
        let checks: Vec<TemplateIntegrity> = templates.iter().map(check_template).collect();

        let multiple_active = TemplateType::ALL
            .into_iter()
            .filter(|ty| {
                templates
                    .iter()
                    .filter(|t| t.is_active && t.template_type == *ty)
                    .count()
                    > 1
            })
            .collect();

        let is_intact = checks.iter().all(TemplateIntegrity::is_intact);

        Self {
            templates: checks,
            multiple_active,
            is_intact,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &TemplateIntegrity> {
        self.templates.iter().filter(|t| !t.is_intact())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn template(content: &str, arabic: Option<&str>) -> AgreementTemplate {
        let now = Utc::now();
        AgreementTemplate {
            id: Uuid::new_v4(),
            template_type: TemplateType::CoOwnership,
            name: "Co-Ownership Agreement".into(),
            content: content.into(),
            content_arabic: arabic.map(Into::into),
            content_hash: content_hash(content),
            content_hash_arabic: arabic.map(content_hash),
            version: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn known_sha256_vector() {
        assert_eq!(
            content_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_byte_exact() {
        assert_ne!(content_hash("A"), content_hash("A "));
        assert_ne!(content_hash("A"), content_hash("a"));
    }

    #[test]
    fn untouched_template_verifies() {
        assert!(verify_template(&template("A", Some("أ"))));
        assert!(verify_template(&template("A", None)));
    }

    #[test]
    fn edited_content_without_rehash_fails() {
        let mut t = template("A", Some("أ"));
        t.content.push('!');
        let check = check_template(&t);
        assert!(!check.english_ok);
        assert!(check.arabic_ok);
        assert_eq!(
            check.mismatch_reason().as_deref(),
            Some("English content hash mismatch")
        );
    }

    #[test]
    fn arabic_content_without_hash_fails() {
        let mut t = template("A", Some("أ"));
        t.content_hash_arabic = None;
        let check = check_template(&t);
        assert!(check.english_ok);
        assert!(!check.arabic_ok);
    }

    #[test]
    fn arabic_hash_without_content_fails() {
        let mut t = template("A", Some("أ"));
        t.content_arabic = None;
        assert!(!verify_template(&t));
    }

    #[test]
    fn report_flags_duplicate_active_types() {
        let a = template("A", None);
        let b = template("B", None);
        let mut c = template("C", None);
        c.template_type = TemplateType::PowerOfAttorney;
        c.content_hash = content_hash("tampered");

        let report = IntegrityReport::build(&[a, b, c]);
        assert_eq!(report.multiple_active, vec![TemplateType::CoOwnership]);
        assert!(!report.is_intact);
        assert_eq!(report.failures().count(), 1);
    }
}
