//! Object storage endpoints (`/storage/v1`).

use crate::error::{GatewayError, Result};
use crate::response::{error_from, parse_json};
use crate::types::{RemoveRequest, UploadResponse};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Storage client bound to one bucket.
pub struct StorageClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    api_key: &'a str,
    bearer: &'a str,
    bucket: &'a str,
}

impl<'a> StorageClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        api_key: &'a str,
        bearer: &'a str,
        bucket: &'a str,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            bearer,
            bucket,
        }
    }

    /// Upload an object. Existing objects are not overwritten.
    ///
    /// Returns the object path, which is what the tables reference.
    pub async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let url = object_url(self.base_url, &["storage", "v1", "object", self.bucket], path)?;
        let size = bytes.len();
        debug!(url = %url, size, "Uploading object");

        let response = self
            .http
            .post(url)
            .header("apikey", self.api_key)
            .bearer_auth(self.bearer)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .header("cache-control", "max-age=3600")
            .body(bytes)
            .send()
            .await
            .map_err(GatewayError::from_send)?;

        let status = response.status();
        if status.is_success() {
            let stored: UploadResponse = parse_json(response, "upload response").await?;
            info!(key = %stored.key, size, "Object uploaded");
            Ok(path.to_string())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Remove objects by path.
    pub async fn remove(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
        debug!(url = %url, count = paths.len(), "Removing objects");

        let response = self
            .http
            .delete(&url)
            .header("apikey", self.api_key)
            .bearer_auth(self.bearer)
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await
            .map_err(GatewayError::from_send)?;

        let status = response.status();
        if status.is_success() {
            info!(count = paths.len(), "Objects removed");
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Public URL of an object. No request is made.
    pub fn public_url(&self, path: &str) -> String {
        public_url(self.base_url, self.bucket, path)
    }
}

/// Public URL of an object in a public bucket.
pub fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
    object_url(base_url, &["storage", "v1", "object", "public", bucket], path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| {
            format!(
                "{}/storage/v1/object/public/{}/{}",
                base_url,
                bucket,
                path.trim_start_matches('/')
            )
        })
}

fn object_url(base_url: &str, prefix: &[&str], path: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(base_url.to_string()))?;
        segments.pop_if_empty();
        segments.extend(prefix);
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_layout() {
        assert_eq!(
            public_url("https://abc.supabase.co", "music-cms", "audio/1_abcde.mp3"),
            "https://abc.supabase.co/storage/v1/object/public/music-cms/audio/1_abcde.mp3"
        );
    }

    #[test]
    fn public_url_encodes_segments() {
        let url = public_url("https://abc.supabase.co", "music-cms", "thumbnails/my cover.jpg");
        assert!(url.ends_with("/thumbnails/my%20cover.jpg"));
    }
}
