//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as record ids or strings. Enums are stored as strings
//! with ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "agreement_templates",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "signature_requirements",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: agreement templates
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
DEFINE TABLE agreement_template SCHEMAFULL;
DEFINE FIELD template_type ON TABLE agreement_template TYPE string \
    ASSERT $value IN ['co_ownership', 'power_of_attorney', \
    'jop_declaration'];
DEFINE FIELD name ON TABLE agreement_template TYPE string;
DEFINE FIELD content ON TABLE agreement_template TYPE string \
    ASSERT string::len(string::trim($value)) > 0;
DEFINE FIELD content_arabic ON TABLE agreement_template \
    TYPE option<string>;
DEFINE FIELD content_hash ON TABLE agreement_template TYPE string;
DEFINE FIELD content_hash_arabic ON TABLE agreement_template \
    TYPE option<string>;
DEFINE FIELD version ON TABLE agreement_template TYPE int \
    DEFAULT 1 ASSERT $value >= 1;
DEFINE FIELD is_active ON TABLE agreement_template TYPE bool \
    DEFAULT true;
DEFINE FIELD created_at ON TABLE agreement_template TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE agreement_template TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_template_type_active ON TABLE agreement_template \
    COLUMNS template_type, is_active;
";

// -----------------------------------------------------------------------
// Schema v2: signature counts per property document
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE TABLE signature_requirement SCHEMAFULL;
DEFINE FIELD property_id ON TABLE signature_requirement TYPE string;
DEFINE FIELD template_id ON TABLE signature_requirement TYPE string;
DEFINE FIELD total_required ON TABLE signature_requirement TYPE int \
    ASSERT $value >= 1;
DEFINE FIELD signed_count ON TABLE signature_requirement TYPE int \
    DEFAULT 0 ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE signature_requirement TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE signature_requirement TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_signature_property_template \
    ON TABLE signature_requirement \
    COLUMNS property_id, template_id UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
        assert!(!SCHEMA_V2.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn template_types_match_domain_enum() {
        for ty in coown_core::models::template::TemplateType::ALL {
            assert!(
                SCHEMA_V1.contains(&format!("'{}'", ty.as_str())),
                "schema does not allow {ty}"
            );
        }
    }
}
