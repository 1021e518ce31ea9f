//! Client for the stream (blob storage) service.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::models::DraftFile;

/// Success body of the upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Thin binding for the storage service's upload endpoint.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: Client,
    base: String,
}

impl StorageClient {
    /// `base` is the API base address, e.g. `http://localhost:7072/api`.
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Upload a file and return the durable URL storage assigned to it.
    ///
    /// `POST /uploadFile`, multipart field `file`. A 2xx response whose body
    /// carries no usable `url` is still a failure: the URL is always
    /// service-assigned, never invented client-side.
    pub async fn upload(&self, file: &DraftFile) -> Result<String, ServiceError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        let res = self
            .http
            .post(format!("{}/uploadFile", self.base))
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        let body: UploadResponse = serde_json::from_str(&res.text().await?)?;
        match body.url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ServiceError::MissingField("url")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_file() -> DraftFile {
        DraftFile {
            name: "track.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            bytes: b"ID3\x04fake-mp3-bytes".to_vec(),
        }
    }

    fn client_for(server: &MockServer) -> StorageClient {
        StorageClient::new(Client::new(), server.uri())
    }

    #[tokio::test]
    async fn test_upload_returns_assigned_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploadFile"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "https://blob/abc.mp3"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server).upload(&sample_file()).await.unwrap();
        assert_eq!(url, "https://blob/abc.mp3");

        // The payload went out as a multipart form under the `file` field.
        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"track.mp3\""));
    }

    #[tokio::test]
    async fn test_upload_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploadFile"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server).upload(&sample_file()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status(s) if s.as_u16() == 502));
    }

    #[tokio::test]
    async fn test_upload_rejects_success_without_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploadFile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let err = client_for(&server).upload(&sample_file()).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("url")));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploadFile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": ""})))
            .mount(&server)
            .await;

        let err = client_for(&server).upload(&sample_file()).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("url")));
    }

    #[tokio::test]
    async fn test_upload_rejects_unparseable_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploadFile"))
            .respond_with(ResponseTemplate::new(200).set_body_string("created"))
            .mount(&server)
            .await;

        let err = client_for(&server).upload(&sample_file()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
