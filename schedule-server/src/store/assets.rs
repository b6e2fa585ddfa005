//! Static directory for uploaded schedule images.

use std::path::{Path, PathBuf};

use super::error::UploadError;

/// Make an uploaded file name safe to store and serve.
///
/// Keeps only the final path component and replaces anything other than
/// ASCII letters, digits, `.`, `-` and `_` with an underscore, so the name
/// can be used in a `/static` URL as-is. Returns `None` if nothing usable
/// is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(
        base.chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
                _ => '_',
            })
            .collect(),
    )
}

/// Directory holding uploaded assets, served under `/static`.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    /// Use `root` as the asset directory, creating it if needed.
    pub fn create(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an uploaded image and return its sanitized file name.
    ///
    /// `content_type` is the part's declared type, if the client sent one.
    pub fn store_image(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if let Some(ct) = content_type
            && !ct.starts_with("image/")
        {
            return Err(UploadError::NotAnImage(ct.to_string()));
        }

        let safe = sanitize_filename(file_name)
            .ok_or_else(|| UploadError::InvalidFilename(file_name.to_string()))?;

        std::fs::write(self.root.join(&safe), bytes)?;
        Ok(safe)
    }
}
