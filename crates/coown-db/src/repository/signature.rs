//! SurrealDB implementation of [`SignatureRepository`].

use chrono::{DateTime, Utc};
use coown_core::error::{CoownError, CoownResult};
use coown_core::models::signature::{CreateSignatureRequirement, SignatureRequirement};
use coown_core::repository::SignatureRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RequirementRow {
    property_id: String,
    template_id: String,
    total_required: u32,
    signed_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RequirementRow {
    fn into_requirement(self, id: Uuid) -> Result<SignatureRequirement, DbError> {
        Ok(SignatureRequirement {
            id,
            property_id: parse_uuid(&self.property_id, "property")?,
            template_id: parse_uuid(&self.template_id, "template")?,
            total_required: self.total_required,
            signed_count: self.signed_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct RequirementRowWithId {
    record_id: String,
    property_id: String,
    template_id: String,
    total_required: u32,
    signed_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RequirementRowWithId {
    fn try_into_requirement(self) -> Result<SignatureRequirement, DbError> {
        let id = parse_uuid(&self.record_id, "record")?;
        Ok(SignatureRequirement {
            id,
            property_id: parse_uuid(&self.property_id, "property")?,
            template_id: parse_uuid(&self.template_id, "template")?,
            total_required: self.total_required,
            signed_count: self.signed_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

fn already_tracked(property_id: Uuid, template_id: Uuid) -> CoownError {
    CoownError::validation(format!(
        "signatures for template {template_id} are already tracked on property {property_id}"
    ))
}

/// SurrealDB implementation of the signature tracking repository.
#[derive(Clone)]
pub struct SurrealSignatureRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSignatureRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find(
        &self,
        property_id: Uuid,
        template_id: Uuid,
    ) -> CoownResult<SignatureRequirement> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM signature_requirement \
                 WHERE property_id = $property_id AND template_id = $template_id",
            )
            .bind(("property_id", property_id.to_string()))
            .bind(("template_id", template_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RequirementRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "signature_requirement".into(),
            id: format!("property={property_id},template={template_id}"),
        })?;

        Ok(row.try_into_requirement()?)
    }
}

impl<C: Connection> SignatureRepository for SurrealSignatureRepository<C> {
    async fn create_requirement(
        &self,
        input: CreateSignatureRequirement,
    ) -> CoownResult<SignatureRequirement> {
        if input.total_required == 0 {
            return Err(CoownError::validation(
                "a document needs at least one required signature",
            ));
        }

        let property_id_str = input.property_id.to_string();
        let template_id_str = input.template_id.to_string();

        // Verify the template exists and the pair is not tracked yet.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM agreement_template \
                 WHERE id = type::record('agreement_template', $template_id) \
                 GROUP ALL; \
                 SELECT count() AS total FROM signature_requirement \
                 WHERE property_id = $property_id \
                 AND template_id = $template_id GROUP ALL;",
            )
            .bind(("template_id", template_id_str.clone()))
            .bind(("property_id", property_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let template_count: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if template_count.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "agreement_template".into(),
                id: template_id_str,
            }
            .into());
        }

        let existing: Vec<CountRow> = check.take(1).map_err(DbError::from)?;
        if existing.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Err(already_tracked(input.property_id, input.template_id));
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let created = self
            .db
            .query(
                "CREATE type::record('signature_requirement', $id) SET \
                 property_id = $property_id, \
                 template_id = $template_id, \
                 total_required = $total_required, \
                 signed_count = 0",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", property_id_str))
            .bind(("template_id", template_id_str))
            .bind(("total_required", input.total_required))
            .await
            .and_then(|response| response.check());

        let mut result = match created {
            Ok(result) => result,
            Err(e) => {
                // A concurrent registration of the same pair got there first:
                // either the unique index rejected us or the write conflicted.
                if self.find(input.property_id, input.template_id).await.is_ok() {
                    return Err(already_tracked(input.property_id, input.template_id));
                }
                return Err(DbError::Query(e.to_string()).into());
            }
        };

        let rows: Vec<RequirementRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "signature_requirement".into(),
            id: id_str,
        })?;

        Ok(row.into_requirement(id)?)
    }

    async fn record_signature(
        &self,
        property_id: Uuid,
        template_id: Uuid,
    ) -> CoownResult<SignatureRequirement> {
        let current = self.find(property_id, template_id).await?;
        let id_str = current.id.to_string();

        // The guard keeps the count from passing the requirement even if
        // two signatures race for the last slot.
        let result = self
            .db
            .query(
                "UPDATE type::record('signature_requirement', $id) SET \
                 signed_count += 1, updated_at = time::now() \
                 WHERE signed_count < total_required",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<RequirementRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Err(CoownError::validation(format!(
                "all {} required signatures already collected",
                current.total_required
            )));
        };

        let requirement = row.into_requirement(current.id)?;
        info!(
            property_id = %property_id,
            template_id = %template_id,
            signed = requirement.signed_count,
            required = requirement.total_required,
            "Signature recorded"
        );
        Ok(requirement)
    }

    async fn list_by_property(&self, property_id: Uuid) -> CoownResult<Vec<SignatureRequirement>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM signature_requirement \
                 WHERE property_id = $property_id \
                 ORDER BY created_at ASC",
            )
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RequirementRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_requirement())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
