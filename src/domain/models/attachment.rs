#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use tokio::fs;

/// A file staged for upload. Exists only for the duration of one outgoing
/// request and is dropped once sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

// File types accepted by the upload widget in the original dashboard.
const ACCEPTED_EXTENSIONS: [&str; 7] = ["pdf", "jpg", "jpeg", "png", "bmp", "gif", "webp"];

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "pdf" => return "application/pdf",
        "jpg" | "jpeg" => return "image/jpeg",
        "png" => return "image/png",
        "bmp" => return "image/bmp",
        "gif" => return "image/gif",
        "webp" => return "image/webp",
        _ => return "application/octet-stream",
    }
}

impl Attachment {
    pub fn new(filename: &str, bytes: Vec<u8>, mime_type: &str) -> Attachment {
        return Attachment {
            filename: filename.to_string(),
            bytes,
            mime_type: mime_type.to_string(),
        };
    }

    pub async fn from_path(file_path: &str) -> Result<Attachment> {
        let path = path::PathBuf::from(file_path);
        let ext = path
            .extension()
            .map(|e| return e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            bail!(format!(
                "Unsupported file type {file_path}. Accepted types are: {}",
                ACCEPTED_EXTENSIONS.join(", ")
            ));
        }

        let filename = path
            .file_name()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_else(|| return file_path.to_string());

        let bytes = fs::read(&path).await?;

        return Ok(Attachment::new(&filename, bytes, mime_for_extension(&ext)));
    }
}
