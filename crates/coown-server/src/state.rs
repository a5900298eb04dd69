//! Shared handler state.

use std::sync::Arc;

use coown_agreements::{AgreementConfig, SignatureService, TemplateService};
use coown_db::repository::{SurrealSignatureRepository, SurrealTemplateRepository};
use surrealdb::{Connection, Surreal};

pub type Templates<C> = TemplateService<SurrealTemplateRepository<C>>;
pub type Signatures<C> =
    SignatureService<SurrealTemplateRepository<C>, SurrealSignatureRepository<C>>;

/// Services behind the HTTP API, built over one store handle.
pub struct AppState<C: Connection> {
    pub templates: Arc<Templates<C>>,
    pub signatures: Arc<Signatures<C>>,
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, config: AgreementConfig) -> Self {
        let templates =
            TemplateService::new(SurrealTemplateRepository::new(db.clone()), config.clone());
        let signatures = SignatureService::new(
            SurrealTemplateRepository::new(db.clone()),
            SurrealSignatureRepository::new(db),
            config,
        );
        Self {
            templates: Arc::new(templates),
            signatures: Arc::new(signatures),
        }
    }
}

// Derived Clone would require `C: Clone`.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            templates: Arc::clone(&self.templates),
            signatures: Arc::clone(&self.signatures),
        }
    }
}
