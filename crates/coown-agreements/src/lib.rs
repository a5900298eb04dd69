//! Co-ownership agreement services: template editing with tamper
//! evidence, signature tracking and the DLD export gate.

pub mod config;
pub mod error;
pub mod service;
pub mod signatures;

pub use config::AgreementConfig;
pub use error::AgreementError;
pub use service::TemplateService;
pub use signatures::{ExportReadiness, SignatureService};
