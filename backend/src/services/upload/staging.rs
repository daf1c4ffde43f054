use crate::error::AppError;
use actix_multipart::Field;
use futures_util::StreamExt;
use log::warn;
use md5::Context;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::{Builder, NamedTempFile};

/// An uploaded workbook written to the staging directory.
///
/// The file is deleted when this value is dropped or removed, so early returns
/// and cancelled requests clean up too. A failed deletion is logged either way.
pub struct StagedUpload {
    file: Option<NamedTempFile>,
    path: PathBuf,
    pub size: usize,
    pub md5: String,
}

impl StagedUpload {
    fn new(file: NamedTempFile) -> Self {
        Self {
            path: file.path().to_path_buf(),
            file: Some(file),
            size: 0,
            md5: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_mut(&mut self) -> Result<&mut NamedTempFile, AppError> {
        self.file
            .as_mut()
            .ok_or_else(|| AppError::Internal("staged upload already removed".into()))
    }

    pub fn remove(mut self) {
        self.delete();
    }

    fn delete(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.close() {
                warn!("Error deleting temp file {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        self.delete();
    }
}

pub fn has_xlsx_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".xlsx")
}

/// Reduces a client-supplied filename to a safe basename.
fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let base = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.xlsx");
    let unsafe_chars =
        Regex::new(r"[^A-Za-z0-9._-]").map_err(|e| AppError::Internal(format!("Regex error: {}", e)))?;
    Ok(unsafe_chars.replace_all(base, "_").into_owned())
}

/// Streams a multipart field into `dir`, creating the directory if needed.
///
/// The staged name is `upload-<unix millis>-<random>-<filename>`. Fails with
/// `PayloadTooLarge` once more than `limit` bytes have arrived.
pub async fn stage_field(
    field: &mut Field,
    dir: &Path,
    filename: &str,
    limit: usize,
) -> Result<StagedUpload, AppError> {
    tokio::fs::create_dir_all(dir).await?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let file = Builder::new()
        .prefix(&format!("upload-{}-", millis))
        .suffix(&format!("-{}", sanitize_filename(filename)?))
        .tempfile_in(dir)?;
    let mut staged = StagedUpload::new(file);

    let mut md5_hasher = Context::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        staged.size += chunk.len();
        if staged.size > limit {
            return Err(AppError::PayloadTooLarge(limit));
        }
        md5_hasher.consume(&chunk);
        staged.file_mut()?.write_all(&chunk)?;
    }
    staged.file_mut()?.flush()?;
    staged.md5 = format!("{:x}", md5_hasher.finalize());

    Ok(staged)
}
