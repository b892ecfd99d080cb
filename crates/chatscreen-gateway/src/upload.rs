// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image upload handling: filename sanitizing, type checks and storage.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use chatscreen_config::model::UploadConfig;
use chatscreen_core::{ChatscreenError, InputError};

use crate::error::ApiError;

/// Multipart field that carries the file.
pub const FILE_FIELD: &str = "file";

/// A file pulled out of a multipart body.
#[derive(Debug)]
pub struct ReceivedFile {
    /// Name as sent by the client.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Stem used when nothing of the client's stem survives sanitizing.
pub const FALLBACK_STEM: &str = "upload";

/// Make a client-supplied filename safe to place in the upload directory.
///
/// Path components are dropped, whitespace becomes `_`, and anything other
/// than ASCII alphanumerics, `.`, `_` and `-` is removed. Leading dots and
/// underscores are stripped so the result is never hidden or a traversal.
/// The extension is kept; a stem that cleans down to nothing becomes
/// [`FALLBACK_STEM`].
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (base, None),
    };

    let stem = clean(stem);
    let stem = stem.trim_start_matches(['.', '_']);
    match ext.map(clean).filter(|ext| !ext.is_empty()) {
        Some(ext) if stem.is_empty() => format!("{FALLBACK_STEM}.{ext}"),
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn clean(part: &str) -> String {
    part.chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect()
}

/// Lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// True when the extension is in the configured allow list, ignoring case.
pub fn is_allowed(filename: &str, config: &UploadConfig) -> bool {
    extension_of(filename).is_some_and(|ext| {
        config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    })
}

/// MIME type for an allowed image extension.
pub fn mime_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Pull the `file` field out of a multipart body.
pub async fn read_file_field(mut multipart: Multipart) -> Result<ReceivedFile, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err(InputError::EmptyFilename.into());
        }
        let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
        return Ok(ReceivedFile {
            original_name,
            bytes,
        });
    }
    Err(InputError::MissingFile.into())
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Rejection {
        status: err.status(),
        message: err.body_text(),
    }
}

/// Validate `file` and write it under the upload directory.
///
/// Returns the sanitized filename it was stored as. An existing file with
/// the same name is replaced.
pub async fn store(file: &ReceivedFile, config: &UploadConfig) -> Result<String, ApiError> {
    let filename = sanitize_filename(&file.original_name);
    if !is_allowed(&filename, config) {
        let ext = extension_of(&file.original_name).unwrap_or_default();
        return Err(InputError::DisallowedExtension(ext).into());
    }

    let dir = Path::new(&config.directory);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ChatscreenError::Internal(format!("cannot create upload directory: {e}")))?;

    let path: PathBuf = dir.join(&filename);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| ChatscreenError::Internal(format!("cannot write upload: {e}")))?;

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &str) -> UploadConfig {
        UploadConfig {
            directory: dir.to_string(),
            ..UploadConfig::default()
        }
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat pic.JPG"), "cat_pic.JPG");
        assert_eq!(sanitize_filename("..hidden.gif"), "hidden.gif");
        assert_eq!(sanitize_filename("ünïcødé?.png"), "ncd.png");
        assert_eq!(sanitize_filename("/"), "");
        assert_eq!(sanitize_filename("archive.tar.gz"), "archive.tar.gz");
    }

    #[test]
    fn sanitize_keeps_extension_when_stem_vanishes() {
        assert_eq!(sanitize_filename("文.png"), "upload.png");
        assert_eq!(sanitize_filename(".png"), "upload.png");
        assert_eq!(sanitize_filename("???.JPG"), "upload.JPG");
        assert_eq!(sanitize_filename("文"), "");
    }

    #[test]
    fn extensions_are_case_insensitive() {
        let cfg = config("uploads");
        assert!(is_allowed("photo.PNG", &cfg));
        assert!(is_allowed("a.jpeg", &cfg));
        assert!(!is_allowed("virus.exe", &cfg));
        assert!(!is_allowed("png", &cfg));
        assert!(!is_allowed(".png", &cfg));
        assert!(!is_allowed("photo.png.exe", &cfg));
    }

    #[test]
    fn mime_types() {
        assert_eq!(mime_for("a.png"), "image/png");
        assert_eq!(mime_for("a.JPG"), "image/jpeg");
        assert_eq!(mime_for("a.gif"), "image/gif");
        assert_eq!(mime_for("a"), "application/octet-stream");
    }

    #[tokio::test]
    async fn store_writes_sanitized_file() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path().to_str().unwrap());
        let file = ReceivedFile {
            original_name: "my photo.png".into(),
            bytes: vec![1, 2, 3],
        };

        let stored = store(&file, &cfg).await.unwrap();
        assert_eq!(stored, "my_photo.png");
        assert_eq!(
            std::fs::read(tmp.path().join("my_photo.png")).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn store_names_stemless_image() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path().to_str().unwrap());
        let file = ReceivedFile {
            original_name: "文.png".into(),
            bytes: vec![7],
        };

        assert_eq!(store(&file, &cfg).await.unwrap(), "upload.png");
        assert!(tmp.path().join("upload.png").exists());
    }

    #[tokio::test]
    async fn store_rejects_disallowed_type() {
        let cfg = config("unused");
        let file = ReceivedFile {
            original_name: "virus.exe".into(),
            bytes: vec![0],
        };
        let err = store(&file, &cfg).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Domain(ChatscreenError::Input(InputError::DisallowedExtension(_)))
        ));
    }
}
