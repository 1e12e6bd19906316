//! Claim attachments: upload validation and deterministic blob addressing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::claim::ClaimId;
use super::principal::UserId;

/// Maximum accepted attachment size.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// File extensions accepted for claim attachments (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "png", "jpg", "jpeg", "gif", "zip"];

/// Why an upload was rejected. Rejection of any file fails the whole
/// claim-creation request; nothing is partially attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRejection {
    Oversize { filename: String, size: usize },
    DisallowedType { filename: String },
    InvalidFilename { filename: String },
}

impl DocumentRejection {
    /// The file the rejection refers to.
    pub fn filename(&self) -> &str {
        match self {
            Self::Oversize { filename, .. }
            | Self::DisallowedType { filename }
            | Self::InvalidFilename { filename } => filename,
        }
    }
}

impl fmt::Display for DocumentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversize { filename, size } => write!(
                f,
                "document {filename} is {size} bytes; the limit is {MAX_DOCUMENT_BYTES} bytes"
            ),
            Self::DisallowedType { filename } => write!(
                f,
                "document {filename} has a disallowed type; accepted extensions are pdf, png, jpg, jpeg, gif, zip"
            ),
            Self::InvalidFilename { filename } => {
                write!(f, "document filename {filename:?} is not acceptable")
            }
        }
    }
}

impl std::error::Error for DocumentRejection {}

/// One uploaded file blob, pre-persistence.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blob contents are elided; they can be megabytes.
        f.debug_struct("DocumentUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

fn filename_is_safe(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

/// Validate one upload against the size and extension rules.
pub fn validate_upload(upload: &DocumentUpload) -> Result<(), DocumentRejection> {
    if !filename_is_safe(&upload.filename) {
        return Err(DocumentRejection::InvalidFilename {
            filename: upload.filename.clone(),
        });
    }
    let extension = extension_of(&upload.filename).ok_or_else(|| {
        DocumentRejection::DisallowedType {
            filename: upload.filename.clone(),
        }
    })?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DocumentRejection::DisallowedType {
            filename: upload.filename.clone(),
        });
    }
    if upload.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(DocumentRejection::Oversize {
            filename: upload.filename.clone(),
            size: upload.bytes.len(),
        });
    }
    Ok(())
}

/// Deterministic blob address for an attachment, so stored files are
/// retrievable without a side lookup table.
pub fn blob_path(owner: &UserId, claim: ClaimId, filename: &str) -> Result<String, DocumentRejection> {
    if !filename_is_safe(filename) {
        return Err(DocumentRejection::InvalidFilename {
            filename: filename.to_owned(),
        });
    }
    Ok(format!("{owner}/claims/{claim}/{filename}"))
}

/// A persisted claim attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDocument {
    pub id: i64,
    pub claim_id: ClaimId,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub blob_ref: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Attachment fields persisted alongside a newly created claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaimDocument {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub blob_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn upload(filename: &str, size: usize) -> DocumentUpload {
        DocumentUpload {
            filename: filename.to_owned(),
            content_type: "application/octet-stream".to_owned(),
            bytes: vec![0; size],
        }
    }

    #[rstest]
    #[case("proof.pdf")]
    #[case("photo.PNG")]
    #[case("scan.JpEg")]
    #[case("bundle.zip")]
    fn accepts_allowed_extensions_case_insensitively(#[case] filename: &str) {
        assert_eq!(validate_upload(&upload(filename, 1024)), Ok(()));
    }

    #[rstest]
    #[case("malware.exe")]
    #[case("notes.txt")]
    #[case("noextension")]
    #[case("trailingdot.")]
    fn rejects_disallowed_types(#[case] filename: &str) {
        let err = validate_upload(&upload(filename, 16)).expect_err("must reject");
        assert!(matches!(
            err,
            DocumentRejection::DisallowedType { .. } | DocumentRejection::InvalidFilename { .. }
        ));
    }

    #[test]
    fn rejects_oversize_uploads() {
        let err =
            validate_upload(&upload("big.pdf", MAX_DOCUMENT_BYTES + 1)).expect_err("must reject");
        assert!(matches!(err, DocumentRejection::Oversize { size, .. } if size == MAX_DOCUMENT_BYTES + 1));
    }

    #[test]
    fn accepts_uploads_exactly_at_the_limit() {
        assert_eq!(validate_upload(&upload("edge.pdf", MAX_DOCUMENT_BYTES)), Ok(()));
    }

    #[test]
    fn blob_paths_are_deterministic() {
        let owner = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let path = blob_path(&owner, ClaimId::new(9), "proof.pdf").expect("safe filename");
        assert_eq!(
            path,
            "3fa85f64-5717-4562-b3fc-2c963f66afa6/claims/9/proof.pdf"
        );
    }

    #[rstest]
    #[case("../escape.pdf")]
    #[case("nested/inner.pdf")]
    #[case("back\\slash.pdf")]
    #[case("")]
    #[case("..")]
    fn blob_paths_reject_traversal(#[case] filename: &str) {
        let owner = UserId::random();
        assert!(blob_path(&owner, ClaimId::new(1), filename).is_err());
    }
}
