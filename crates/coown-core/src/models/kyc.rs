//! KYC document upload state.
//!
//! The set of document kinds is closed, so the upload state is a plain
//! record with one slot per kind.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KycDocumentKind {
    Identity,
    ProofOfAddress,
    ProofOfFunds,
}

impl KycDocumentKind {
    pub const ALL: [KycDocumentKind; 3] = [
        KycDocumentKind::Identity,
        KycDocumentKind::ProofOfAddress,
        KycDocumentKind::ProofOfFunds,
    ];
}

/// Upload progress for a single document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KycSlot {
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub uploaded: bool,
}

/// Upload progress for an investor's KYC documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KycUploadState {
    pub identity: KycSlot,
    pub proof_of_address: KycSlot,
    pub proof_of_funds: KycSlot,
}

impl KycUploadState {
    pub fn slot(&self, kind: KycDocumentKind) -> &KycSlot {
        match kind {
            KycDocumentKind::Identity => &self.identity,
            KycDocumentKind::ProofOfAddress => &self.proof_of_address,
            KycDocumentKind::ProofOfFunds => &self.proof_of_funds,
        }
    }

    pub fn slot_mut(&mut self, kind: KycDocumentKind) -> &mut KycSlot {
        match kind {
            KycDocumentKind::Identity => &mut self.identity,
            KycDocumentKind::ProofOfAddress => &mut self.proof_of_address,
            KycDocumentKind::ProofOfFunds => &mut self.proof_of_funds,
        }
    }

    /// Record a finished upload, replacing any earlier file for that kind.
    pub fn mark_uploaded(
        &mut self,
        kind: KycDocumentKind,
        file_name: impl Into<String>,
        size_bytes: u64,
    ) {
        let slot = self.slot_mut(kind);
        slot.file_name = Some(file_name.into());
        slot.size_bytes = Some(size_bytes);
        slot.uploaded = true;
    }

    /// Kinds still waiting for an upload, in declaration order.
    pub fn missing(&self) -> Vec<KycDocumentKind> {
        KycDocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.slot(*kind).uploaded)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_missing_everything() {
        let state = KycUploadState::default();
        assert_eq!(state.missing(), KycDocumentKind::ALL.to_vec());
        assert!(!state.is_complete());
    }

    #[test]
    fn uploads_fill_their_own_slot() {
        let mut state = KycUploadState::default();
        state.mark_uploaded(KycDocumentKind::ProofOfAddress, "dewa-bill.pdf", 48_213);

        let slot = state.slot(KycDocumentKind::ProofOfAddress);
        assert!(slot.uploaded);
        assert_eq!(slot.file_name.as_deref(), Some("dewa-bill.pdf"));
        assert_eq!(slot.size_bytes, Some(48_213));
        assert!(!state.identity.uploaded);
        assert_eq!(
            state.missing(),
            vec![KycDocumentKind::Identity, KycDocumentKind::ProofOfFunds]
        );
    }

    #[test]
    fn all_uploads_complete_the_state() {
        let mut state = KycUploadState::default();
        for kind in KycDocumentKind::ALL {
            state.mark_uploaded(kind, "doc.pdf", 1);
        }
        assert!(state.is_complete());
    }
}
