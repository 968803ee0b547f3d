use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::error::{MdqpError, Result};
use crate::metadata;

use super::{artifact_name, store_artifact, SignedMetadataSource};

/// HTTP client for a real MDQ service.
///
/// A response only becomes an artifact if it comes back `200` with an
/// `application/xml` content type and parses as metadata with an entityID.
/// Anything else is an error and the previously published artifact, if any,
/// stays untouched.
pub struct MdqClient {
    base_url: String,
    http: Client,
}

impl MdqClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        MdqClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Request URL for an entity hash.
    pub fn entity_url(&self, sha1: &str) -> String {
        format!("{}/entities/{}", self.base_url, artifact_name(sha1))
    }
}

impl SignedMetadataSource for MdqClient {
    fn fetch_signed(&self, sha1: &str, dest_dir: &Path) -> Result<PathBuf> {
        let url = self.entity_url(sha1);
        let response = self.http.get(&url).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MdqpError::mdq(format!("{url} returned status {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("application/xml") {
            return Err(MdqpError::mdq(format!(
                "{url} returned content type '{content_type}', expected application/xml"
            )));
        }

        let body = response.bytes()?;
        let text = std::str::from_utf8(&body)
            .map_err(|_| MdqpError::mdq(format!("{url} returned a non-UTF-8 document")))?;
        metadata::entity_id(text).map_err(|e| MdqpError::mdq(format!("{url}: {e}")))?;

        store_artifact(&body, sha1, dest_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_url_layout() {
        let client = MdqClient::new("https://mds.example.org");
        assert_eq!(
            client.entity_url("abc123"),
            "https://mds.example.org/entities/%7Bsha1%7Dabc123"
        );
    }

    #[test]
    fn test_entity_url_trims_trailing_slash() {
        let client = MdqClient::new("https://mds.example.org/");
        assert_eq!(
            client.entity_url("abc123"),
            "https://mds.example.org/entities/%7Bsha1%7Dabc123"
        );
    }
}
