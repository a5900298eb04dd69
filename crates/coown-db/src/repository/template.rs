//! SurrealDB implementation of [`TemplateRepository`].

use chrono::{DateTime, Utc};
use coown_core::error::{CoownError, CoownResult};
use coown_core::integrity::content_hash;
use coown_core::models::template::{
    AgreementTemplate, CreateAgreementTemplate, EditOutcome, EditTemplateContent, Language,
    TemplateType,
};
use coown_core::repository::TemplateRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TemplateRow {
    template_type: String,
    name: String,
    content: String,
    content_arabic: Option<String>,
    content_hash: String,
    content_hash_arabic: Option<String>,
    version: u32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TemplateRow {
    fn into_template(self, id: Uuid) -> Result<AgreementTemplate, DbError> {
        Ok(AgreementTemplate {
            id,
            template_type: parse_template_type(&self.template_type)?,
            name: self.name,
            content: self.content,
            content_arabic: self.content_arabic,
            content_hash: self.content_hash,
            content_hash_arabic: self.content_hash_arabic,
            version: self.version,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TemplateRowWithId {
    record_id: String,
    template_type: String,
    name: String,
    content: String,
    content_arabic: Option<String>,
    content_hash: String,
    content_hash_arabic: Option<String>,
    version: u32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TemplateRowWithId {
    fn try_into_template(self) -> Result<AgreementTemplate, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(AgreementTemplate {
            id,
            template_type: parse_template_type(&self.template_type)?,
            name: self.name,
            content: self.content,
            content_arabic: self.content_arabic,
            content_hash: self.content_hash,
            content_hash_arabic: self.content_hash_arabic,
            version: self.version,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_template_type(s: &str) -> Result<TemplateType, DbError> {
    s.parse()
        .map_err(|_| DbError::Corrupt(format!("unknown template type: {s}")))
}

/// Field names holding the body and digest for a language.
fn language_fields(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::English => ("content", "content_hash"),
        Language::Arabic => ("content_arabic", "content_hash_arabic"),
    }
}

fn ensure_content(content: &str) -> CoownResult<()> {
    if content.trim().is_empty() {
        return Err(CoownError::validation("template content must not be empty"));
    }
    Ok(())
}

/// SurrealDB implementation of the agreement template repository.
#[derive(Clone)]
pub struct SurrealTemplateRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTemplateRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TemplateRepository for SurrealTemplateRepository<C> {
    async fn create(&self, input: CreateAgreementTemplate) -> CoownResult<AgreementTemplate> {
        if input.name.trim().is_empty() {
            return Err(CoownError::validation("template name must not be empty"));
        }
        ensure_content(&input.content)?;
        if let Some(arabic) = &input.content_arabic {
            ensure_content(arabic)?;
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let hash = content_hash(&input.content);
        let hash_arabic = input.content_arabic.as_deref().map(content_hash);

        let result = self
            .db
            .query(
                "CREATE type::record('agreement_template', $id) SET \
                 template_type = $template_type, \
                 name = $name, \
                 content = $content, \
                 content_arabic = $content_arabic, \
                 content_hash = $content_hash, \
                 content_hash_arabic = $content_hash_arabic, \
                 version = 1, \
                 is_active = $is_active",
            )
            .bind(("id", id_str.clone()))
            .bind(("template_type", input.template_type.as_str()))
            .bind(("name", input.name))
            .bind(("content", input.content))
            .bind(("content_arabic", input.content_arabic))
            .bind(("content_hash", hash))
            .bind(("content_hash_arabic", hash_arabic))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TemplateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "agreement_template".into(),
            id: id_str,
        })?;

        let template = row.into_template(id)?;
        info!(
            template_id = %template.id,
            template_type = %template.template_type,
            "Created agreement template"
        );
        Ok(template)
    }

    async fn get_by_id(&self, id: Uuid) -> CoownResult<AgreementTemplate> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('agreement_template', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TemplateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "agreement_template".into(),
            id: id_str,
        })?;

        Ok(row.into_template(id)?)
    }

    async fn list_all(&self) -> CoownResult<Vec<AgreementTemplate>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM agreement_template \
                 ORDER BY template_type ASC, name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TemplateRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_template())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_active(
        &self,
        template_type: Option<TemplateType>,
    ) -> CoownResult<Vec<AgreementTemplate>> {
        let mut conditions = vec!["is_active = true"];
        if template_type.is_some() {
            conditions.push("template_type = $template_type");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * \
             FROM agreement_template WHERE {} \
             ORDER BY template_type ASC, name ASC",
            conditions.join(" AND ")
        );

        let mut builder = self.db.query(&query);
        if let Some(ty) = template_type {
            builder = builder.bind(("template_type", ty.as_str()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<TemplateRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_template())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update_content(
        &self,
        id: Uuid,
        input: EditTemplateContent,
    ) -> CoownResult<EditOutcome> {
        ensure_content(&input.content)?;

        let id_str = id.to_string();
        let hash = content_hash(&input.content);
        let (content_field, hash_field) = language_fields(input.language);

        // Body, digest and version move together in one statement. The
        // WHERE guard turns a resubmission of identical text into a no-op.
        let query = format!(
            "UPDATE type::record('agreement_template', $id) SET \
             {content_field} = $content, \
             {hash_field} = $hash, \
             version += 1, \
             updated_at = time::now() \
             WHERE {hash_field} != $hash"
        );

        let result = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("content", input.content))
            .bind(("hash", hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TemplateRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => {
                let template = row.into_template(id)?;
                info!(
                    template_id = %id,
                    language = ?input.language,
                    version = template.version,
                    "Agreement template content updated"
                );
                Ok(EditOutcome {
                    template,
                    changed: true,
                })
            }
            None => {
                // Either the record does not exist or the content is unchanged.
                let template = self.get_by_id(id).await?;
                debug!(
                    template_id = %id,
                    language = ?input.language,
                    "Content unchanged, keeping version {}",
                    template.version
                );
                Ok(EditOutcome {
                    template,
                    changed: false,
                })
            }
        }
    }

    async fn set_active(&self, id: Uuid) -> CoownResult<AgreementTemplate> {
        let current = self.get_by_id(id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE agreement_template SET \
                 is_active = false, updated_at = time::now() \
                 WHERE template_type = $template_type \
                 AND is_active = true \
                 AND id != type::record('agreement_template', $id); \
                 UPDATE type::record('agreement_template', $id) SET \
                 is_active = true, updated_at = time::now(); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .bind(("template_type", current.template_type.as_str()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        info!(
            template_id = %id,
            template_type = %current.template_type,
            "Activated agreement template"
        );

        self.get_by_id(id).await
    }

    async fn count(&self) -> CoownResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM agreement_template GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
