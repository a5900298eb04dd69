//! Co-ownership core: domain models, repository traits and the
//! tamper-evidence primitives shared by every crate in the workspace.

pub mod error;
pub mod integrity;
pub mod models;
pub mod repository;

pub use error::{CoownError, CoownResult};
pub use integrity::{content_hash, verify_template};
