//! Source photo intake.

use std::path::Path;

use image::ImageFormat;

use crate::constants::{ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES};
use crate::types::{Result, ValidationError};

/// A photo picked by the user, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type declared by the picker, if any
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, declared_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type,
            bytes,
        }
    }

    /// Read a photo from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let declared_type = ImageFormat::from_path(path)
            .ok()
            .map(|format| format.to_mime_type().to_string());
        Ok(Self::new(name, declared_type, bytes))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check type and size against the upload limits.
    ///
    /// The type is sniffed from the file contents; the declared MIME type is
    /// only consulted when the contents are not recognized.
    pub fn validate(&self, max_bytes: u64) -> std::result::Result<AcceptedFormat, ValidationError> {
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if self.size_bytes() > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size_bytes: self.size_bytes(),
                limit_bytes: max_bytes,
            });
        }

        match image::guess_format(&self.bytes) {
            Ok(ImageFormat::Jpeg) => Ok(AcceptedFormat::Jpeg),
            Ok(ImageFormat::Png) => Ok(AcceptedFormat::Png),
            Ok(other) => Err(ValidationError::UnsupportedFileType(
                other.to_mime_type().to_string(),
            )),
            Err(_) => self.declared_format(),
        }
    }

    fn declared_format(&self) -> std::result::Result<AcceptedFormat, ValidationError> {
        let declared = self.declared_type.as_deref().unwrap_or("unknown");
        if !ACCEPTED_MIME_TYPES.contains(&declared) {
            return Err(ValidationError::UnsupportedFileType(declared.to_string()));
        }
        Ok(if declared == "image/png" {
            AcceptedFormat::Png
        } else {
            AcceptedFormat::Jpeg
        })
    }
}

impl Default for UploadFile {
    fn default() -> Self {
        Self::new(String::new(), None, Vec::new())
    }
}

/// Image formats the collaborator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedFormat {
    Jpeg,
    Png,
}

impl AcceptedFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            AcceptedFormat::Jpeg => "image/jpeg",
            AcceptedFormat::Png => "image/png",
        }
    }
}

/// Default ceiling used when no options are supplied
pub fn validate_upload(file: &UploadFile) -> std::result::Result<AcceptedFormat, ValidationError> {
    file.validate(MAX_UPLOAD_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_sniffed_type_wins_over_declared() {
        let file = UploadFile::new("photo.gif", Some("image/gif".into()), PNG_MAGIC.to_vec());
        assert_eq!(validate_upload(&file), Ok(AcceptedFormat::Png));
    }

    #[test]
    fn test_unrecognized_bytes_use_declared_type() {
        let file = UploadFile::new("photo", Some("image/jpeg".into()), vec![1, 2, 3]);
        assert_eq!(validate_upload(&file), Ok(AcceptedFormat::Jpeg));

        let file = UploadFile::new("notes.txt", Some("text/plain".into()), vec![1, 2, 3]);
        assert!(matches!(
            validate_upload(&file),
            Err(ValidationError::UnsupportedFileType(_))
        ));
    }

    #[tokio::test]
    async fn test_load_declares_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        tokio::fs::write(&path, [1u8, 2, 3, 4]).await.unwrap();

        let file = UploadFile::load(&path).await.unwrap();
        assert_eq!(file.name, "scan.jpg");
        assert_eq!(file.declared_type.as_deref(), Some("image/jpeg"));
        assert_eq!(file.size_bytes(), 4);
        assert_eq!(validate_upload(&file), Ok(AcceptedFormat::Jpeg));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadFile::load(dir.path().join("absent.png")).await;
        assert!(matches!(result, Err(crate::types::SheetError::Io(_))));
    }

    #[test]
    fn test_size_ceiling() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(MAX_UPLOAD_BYTES as usize + 1, 0);
        let file = UploadFile::new("big.png", None, bytes);
        assert!(matches!(
            validate_upload(&file),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }
}
