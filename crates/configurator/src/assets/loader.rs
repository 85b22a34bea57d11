//! Fetching asset bytes from the network or the local file system

use std::path::PathBuf;

use tracing::debug;

use super::error::{AssetError, AssetResult};
use super::{AssetFormat, MeshAsset};

/// Where an asset reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Http(String),
    File(PathBuf),
}

impl AssetSource {
    /// Classify a reference: `http(s)://` goes over the network, `file://`
    /// and bare paths are read from disk.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Http(reference.to_string())
        } else if let Some(path) = reference.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(reference))
        }
    }
}

/// Fetch the raw bytes behind a reference
pub async fn fetch_bytes(client: &reqwest::Client, reference: &str) -> AssetResult<Vec<u8>> {
    match AssetSource::parse(reference) {
        AssetSource::Http(url) => {
            let resp = client.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(AssetError::Fetch {
                    url,
                    status: status.as_u16(),
                });
            }
            Ok(resp.bytes().await?.to_vec())
        }
        AssetSource::File(path) => Ok(tokio::fs::read(&path).await?),
    }
}

/// Fetch and decode a mesh asset. Failures are returned, never retried.
pub async fn load(client: &reqwest::Client, reference: &str) -> AssetResult<MeshAsset> {
    let format =
        AssetFormat::from_reference(reference).ok_or_else(|| AssetError::unsupported(reference))?;
    let bytes = fetch_bytes(client, reference).await?;
    let asset = format.decode(&bytes)?;
    debug!(
        reference,
        nodes = asset.nodes.len(),
        triangles = asset.triangle_count(),
        "Decoded asset"
    );
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            AssetSource::parse("https://cdn/models/a.stl"),
            AssetSource::Http("https://cdn/models/a.stl".into())
        );
        assert_eq!(
            AssetSource::parse("file:///tmp/a.obj"),
            AssetSource::File(PathBuf::from("/tmp/a.obj"))
        );
        assert_eq!(
            AssetSource::parse("models/a.obj"),
            AssetSource::File(PathBuf::from("models/a.obj"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("desk-asset-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tri.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n").unwrap();

        let client = reqwest::Client::new();
        let asset = load(&client, path.to_str().unwrap()).await.unwrap();
        assert_eq!(asset.triangle_count(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_load_unsupported_extension() {
        let client = reqwest::Client::new();
        let err = load(&client, "/nowhere/model.fbx").await.unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let client = reqwest::Client::new();
        let err = load(&client, "/definitely/not/here.stl").await.unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }
}
