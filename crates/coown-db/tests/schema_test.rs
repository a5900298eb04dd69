//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    coown_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(
        info_str.contains("agreement_template"),
        "missing agreement_template table"
    );
    assert!(
        info_str.contains("signature_requirement"),
        "missing signature_requirement table"
    );
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice, should not fail.
    coown_db::run_migrations(&db).await.unwrap();
    coown_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 2, "expected one record per migration");
}

#[tokio::test]
async fn unknown_template_type_is_rejected() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    coown_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE agreement_template SET \
             template_type = 'lease', \
             name = 'Lease', \
             content = 'text', \
             content_hash = 'x'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "template type outside the closed set");
}

#[tokio::test]
async fn blank_content_is_rejected_by_schema() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    coown_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE agreement_template SET \
             template_type = 'co_ownership', \
             name = 'Blank', \
             content = '   ', \
             content_hash = 'x'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "whitespace-only content should be rejected");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_requirements() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    coown_db::run_migrations(&db).await.unwrap();

    let create = "CREATE signature_requirement SET \
                  property_id = 'p1', template_id = 't1', \
                  total_required = 2";

    db.query(create).await.unwrap().check().unwrap();
    let result = db.query(create).await.unwrap().check();

    assert!(result.is_err(), "duplicate property/template pair");
}
