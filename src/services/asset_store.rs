//! Binary asset storage for logos and prospectus documents
//!
//! Blobs live on disk under the media root; records hold the relative path.
//! URL resolution mirrors the write side: absolute when a request origin is
//! known, relative otherwise.

use std::path::{Path, PathBuf};

use axum::http::{HeaderMap, header};
use uuid::Uuid;

/// Kind of uploaded asset, deciding the subdirectory a blob lands in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Logo,
    Rhp,
    Drhp,
}

impl AssetKind {
    pub fn subdir(&self) -> &'static str {
        match self {
            AssetKind::Logo => "ipo_logos",
            AssetKind::Rhp => "ipo_documents/rhp",
            AssetKind::Drhp => "ipo_documents/drhp",
        }
    }
}

/// Disk-backed blob store rooted at the configured media directory
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
    public_url: Option<String>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, public_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Media root, served under `/media`
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a blob under a generated path and return the relative path kept
    /// on the record. The original filename contributes only its extension.
    pub async fn store(
        &self,
        kind: AssetKind,
        original_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let filename = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(dir.join(&filename), bytes).await?;

        Ok(format!("{}/{}", kind.subdir(), filename))
    }

    /// Request origin for absolute URL resolution: the configured public URL
    /// when present, otherwise reconstructed from the request headers
    pub fn origin(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(ref url) = self.public_url {
            return Some(url.clone());
        }
        let host = headers.get(header::HOST)?.to_str().ok()?;
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");
        Some(format!("{}://{}", proto, host))
    }
}

/// Resolve a stored relative path to its serving URL. Absolute when an
/// origin is available, relative otherwise.
pub fn media_url(path: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) => format!("{}/media/{}", origin.trim_end_matches('/'), path),
        None => format!("/media/{}", path),
    }
}

fn extension_of(name: &str) -> Option<&str> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}
