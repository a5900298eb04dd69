//! SurrealDB repository implementations.

mod signature;
mod template;

pub use signature::SurrealSignatureRepository;
pub use template::SurrealTemplateRepository;
