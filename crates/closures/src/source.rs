//! Loading notice documents from a local path or an HTTP(S) URL.

use crate::error::Error;

/// True when the source string should be fetched over the network rather
/// than read from disk.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load the raw bytes of a document from a filesystem path or a URL.
pub async fn load(source: &str) -> Result<Vec<u8>, Error> {
    if is_url(source) {
        fetch(source).await
    } else {
        tokio::fs::read(source).await.map_err(|e| Error::Read {
            path: source.to_string(),
            reason: e.to_string(),
        })
    }
}

async fn fetch(url: &str) -> Result<Vec<u8>, Error> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Network(format!("failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Network(format!(
            "failed to fetch {url}: HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(format!("failed to read body of {url}: {e}")))?;

    Ok(bytes.to_vec())
}
