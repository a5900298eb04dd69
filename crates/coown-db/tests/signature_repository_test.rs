//! Integration tests for the signature tracking repository using
//! in-memory SurrealDB.

use coown_core::error::CoownError;
use coown_core::models::signature::CreateSignatureRequirement;
use coown_core::models::template::{CreateAgreementTemplate, TemplateType};
use coown_core::repository::{SignatureRepository, TemplateRepository};
use coown_db::repository::{SurrealSignatureRepository, SurrealTemplateRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create one template.
async fn setup() -> (
    SurrealSignatureRepository<surrealdb::engine::local::Db>,
    Uuid, // template_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    coown_db::run_migrations(&db).await.unwrap();

    let template = SurrealTemplateRepository::new(db.clone())
        .create(CreateAgreementTemplate {
            template_type: TemplateType::CoOwnership,
            name: "Co-Ownership Agreement".into(),
            content: "Agreement for {INVESTOR_NAME}".into(),
            content_arabic: None,
            is_active: true,
        })
        .await
        .unwrap();

    (SurrealSignatureRepository::new(db), template.id)
}

fn requirement(property_id: Uuid, template_id: Uuid, total: u32) -> CreateSignatureRequirement {
    CreateSignatureRequirement {
        property_id,
        template_id,
        total_required: total,
    }
}

#[tokio::test]
async fn create_requirement_starts_unsigned() {
    let (repo, template_id) = setup().await;
    let property_id = Uuid::new_v4();

    let req = repo
        .create_requirement(requirement(property_id, template_id, 4))
        .await
        .unwrap();

    assert_eq!(req.property_id, property_id);
    assert_eq!(req.template_id, template_id);
    assert_eq!(req.total_required, 4);
    assert_eq!(req.signed_count, 0);
}

#[tokio::test]
async fn requirement_for_unknown_template_is_not_found() {
    let (repo, _) = setup().await;

    let err = repo
        .create_requirement(requirement(Uuid::new_v4(), Uuid::new_v4(), 2))
        .await
        .unwrap_err();
    assert!(matches!(err, CoownError::NotFound { .. }));
}

#[tokio::test]
async fn zero_required_signatures_is_rejected() {
    let (repo, template_id) = setup().await;

    let err = repo
        .create_requirement(requirement(Uuid::new_v4(), template_id, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, CoownError::Validation { .. }));
}

#[tokio::test]
async fn duplicate_requirement_is_rejected() {
    let (repo, template_id) = setup().await;
    let property_id = Uuid::new_v4();

    repo.create_requirement(requirement(property_id, template_id, 2))
        .await
        .unwrap();
    let err = repo
        .create_requirement(requirement(property_id, template_id, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, CoownError::Validation { .. }));
}

#[tokio::test]
async fn signatures_count_up_to_the_requirement() {
    let (repo, template_id) = setup().await;
    let property_id = Uuid::new_v4();
    repo.create_requirement(requirement(property_id, template_id, 2))
        .await
        .unwrap();

    let first = repo.record_signature(property_id, template_id).await.unwrap();
    assert_eq!(first.signed_count, 1);
    let second = repo.record_signature(property_id, template_id).await.unwrap();
    assert_eq!(second.signed_count, 2);

    let err = repo
        .record_signature(property_id, template_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoownError::Validation { .. }));

    let stored = repo.list_by_property(property_id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].signed_count, 2);
}

#[tokio::test]
async fn signature_without_requirement_is_not_found() {
    let (repo, template_id) = setup().await;

    let err = repo
        .record_signature(Uuid::new_v4(), template_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoownError::NotFound { .. }));
}

#[tokio::test]
async fn list_by_property_is_scoped() {
    let (repo, template_id) = setup().await;
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    repo.create_requirement(requirement(a, template_id, 2)).await.unwrap();
    repo.create_requirement(requirement(b, template_id, 5)).await.unwrap();

    let for_a = repo.list_by_property(a).await.unwrap();
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].total_required, 2);

    assert!(repo.list_by_property(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_duplicate_registrations_are_validation_errors() {
    let (repo, template_id) = setup().await;
    let property_id = Uuid::new_v4();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let repo = repo.clone();
        tasks.spawn(async move {
            repo.create_requirement(requirement(property_id, template_id, 2))
                .await
        });
    }

    let mut created = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap() {
            Ok(_) => created += 1,
            Err(CoownError::Validation { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(repo.list_by_property(property_id).await.unwrap().len(), 1);
}
