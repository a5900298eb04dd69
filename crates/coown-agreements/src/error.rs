//! Agreement service error types.

use coown_core::error::CoownError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AgreementError {
    #[error("template content must not be empty")]
    EmptyContent,

    #[error("template content is {len} bytes, the limit is {max}")]
    ContentTooLong { len: usize, max: usize },

    #[error("a document may require at most {max} signatures, got {requested}")]
    TooManySignatures { requested: u32, max: u32 },

    #[error("{reason}")]
    IntegrityMismatch { template_id: Uuid, reason: String },
}

impl From<AgreementError> for CoownError {
    fn from(err: AgreementError) -> Self {
        match err {
            AgreementError::IntegrityMismatch {
                template_id,
                reason,
            } => CoownError::Integrity {
                entity: "agreement_template".into(),
                id: template_id.to_string(),
                reason,
            },
            other => CoownError::Validation {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_pass_through_unchanged() {
        let err: CoownError = AgreementError::ContentTooLong { len: 10, max: 5 }.into();
        match err {
            CoownError::Validation { message } => {
                assert_eq!(message, "template content is 10 bytes, the limit is 5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatch_becomes_integrity_error() {
        let id = Uuid::new_v4();
        let err: CoownError = AgreementError::IntegrityMismatch {
            template_id: id,
            reason: "English content hash mismatch".into(),
        }
        .into();
        assert!(matches!(err, CoownError::Integrity { id: ref got, .. } if *got == id.to_string()));
    }
}
