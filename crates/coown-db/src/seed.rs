//! First-run seeding of the canonical agreement templates.

use coown_core::integrity::content_hash;
use coown_core::models::template::{CreateAgreementTemplate, TemplateType};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

/// What a call to [`seed_templates`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and the canonical templates were inserted.
    Seeded { created: usize },
    /// Templates already existed; nothing was written.
    Skipped { existing: u64 },
}

/// The three canonical templates, English and Arabic, active at version 1.
pub fn canonical_templates() -> Vec<CreateAgreementTemplate> {
    vec![
        CreateAgreementTemplate {
            template_type: TemplateType::CoOwnership,
            name: "Co-Ownership Agreement".into(),
            content: include_str!("../seed/co_ownership.en.txt").into(),
            content_arabic: Some(include_str!("../seed/co_ownership.ar.txt").into()),
            is_active: true,
        },
        CreateAgreementTemplate {
            template_type: TemplateType::PowerOfAttorney,
            name: "Special Power of Attorney".into(),
            content: include_str!("../seed/power_of_attorney.en.txt").into(),
            content_arabic: Some(include_str!("../seed/power_of_attorney.ar.txt").into()),
            is_active: true,
        },
        CreateAgreementTemplate {
            template_type: TemplateType::JopDeclaration,
            name: "Joint Ownership Property Declaration".into(),
            content: include_str!("../seed/jop_declaration.en.txt").into(),
            content_arabic: Some(include_str!("../seed/jop_declaration.ar.txt").into()),
            is_active: true,
        },
    ]
}

/// Seed input row, bound as one array so the whole batch is a single
/// transaction.
#[derive(Debug, SurrealValue)]
struct SeedRow {
    key: String,
    template_type: String,
    name: String,
    content: String,
    content_arabic: Option<String>,
    content_hash: String,
    content_hash_arabic: Option<String>,
    is_active: bool,
}

impl From<CreateAgreementTemplate> for SeedRow {
    fn from(t: CreateAgreementTemplate) -> Self {
        let hash = content_hash(&t.content);
        let hash_arabic = t.content_arabic.as_deref().map(content_hash);
        Self {
            key: Uuid::new_v4().to_string(),
            template_type: t.template_type.as_str().to_string(),
            name: t.name,
            content: t.content,
            content_arabic: t.content_arabic,
            content_hash: hash,
            content_hash_arabic: hash_arabic,
            is_active: t.is_active,
        }
    }
}

/// Insert the canonical templates if the store holds none.
///
/// Running it against a populated store performs no writes, so it is safe
/// to call on every startup.
pub async fn seed_templates<C: Connection>(db: &Surreal<C>) -> Result<SeedOutcome, DbError> {
    #[derive(Debug, SurrealValue)]
    struct CountRow {
        total: u64,
    }

    let mut result = db
        .query("SELECT count() AS total FROM agreement_template GROUP ALL")
        .await?;
    let rows: Vec<CountRow> = result.take(0)?;
    let existing = rows.first().map(|r| r.total).unwrap_or(0);

    if existing > 0 {
        info!(existing, "Agreement templates present, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let rows: Vec<SeedRow> = canonical_templates().into_iter().map(SeedRow::from).collect();
    let created = rows.len();

    db.query(
        "BEGIN TRANSACTION; \
         FOR $t IN $templates { \
             CREATE type::record('agreement_template', $t.key) SET \
             template_type = $t.template_type, \
             name = $t.name, \
             content = $t.content, \
             content_arabic = $t.content_arabic, \
             content_hash = $t.content_hash, \
             content_hash_arabic = $t.content_hash_arabic, \
             version = 1, \
             is_active = $t.is_active; \
         }; \
         COMMIT TRANSACTION;",
    )
    .bind(("templates", rows))
    .await?
    .check()
    .map_err(|e| DbError::Query(format!("template seed failed: {e}")))?;

    info!(created, "Seeded canonical agreement templates");

    Ok(SeedOutcome::Seeded { created })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_canonical_template_per_type() {
        let templates = canonical_templates();
        assert_eq!(templates.len(), TemplateType::ALL.len());
        for ty in TemplateType::ALL {
            assert_eq!(
                templates.iter().filter(|t| t.template_type == ty).count(),
                1,
                "expected exactly one {ty} template"
            );
        }
    }

    #[test]
    fn canonical_templates_carry_placeholders_in_both_languages() {
        for t in canonical_templates() {
            assert!(t.content.contains("{INVESTOR_NAME}"));
            assert!(t.content.contains("{PROPERTY_TITLE}"));
            let arabic = t.content_arabic.expect("arabic text");
            assert!(arabic.contains("{INVESTOR_NAME}"));
            assert!(arabic.contains("{PROPERTY_TITLE}"));
        }
    }

    #[test]
    fn seed_rows_hash_their_content() {
        for t in canonical_templates() {
            let row = SeedRow::from(t.clone());
            assert_eq!(row.content_hash, content_hash(&t.content));
            assert_eq!(
                row.content_hash_arabic,
                t.content_arabic.as_deref().map(content_hash)
            );
        }
    }
}
