//! Client for the catalog (metadata) service.

use reqwest::Client;

use crate::error::ServiceError;
use crate::models::{NewSong, Song};

/// Thin binding for the catalog service's list and insert endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base: String,
}

impl CatalogClient {
    /// `base` is the API base address, e.g. `http://localhost:7071/api`.
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Fetch every song record the service holds, in server order.
    ///
    /// `GET /getSongs`
    pub async fn list(&self) -> Result<Vec<Song>, ServiceError> {
        let res = self
            .http
            .get(format!("{}/getSongs", self.base))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        let body = res.text().await?;
        let songs = serde_json::from_str(&body)?;
        Ok(songs)
    }

    /// Insert one song record.
    ///
    /// `POST /addSong`; any 2xx counts as success, the response body is
    /// ignored.
    pub async fn insert(&self, song: &NewSong) -> Result<(), ServiceError> {
        let res = self
            .http
            .post(format!("{}/addSong", self.base))
            .json(song)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(Client::new(), server.uri())
    }

    #[tokio::test]
    async fn test_list_decodes_songs_in_server_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getSongs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "2", "title": "Second", "artist": "B", "url": "https://blob/2.mp3"},
                {"_id": "1", "title": "First", "artist": "A", "url": "https://blob/1.mp3"},
            ])))
            .mount(&server)
            .await;

        let songs = client_for(&server).list().await.unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].id, "2");
        assert_eq!(songs[1].title, "First");
    }

    #[tokio::test]
    async fn test_list_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getSongs"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).list().await.unwrap_err();
        assert!(matches!(err, ServiceError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_list_fails_on_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getSongs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list().await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_insert_posts_full_record() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/addSong"))
            .and(body_json(json!({
                "title": "So What",
                "artist": "Miles Davis",
                "url": "https://blob/so-what.mp3",
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let record = NewSong {
            title: "So What".to_string(),
            artist: "Miles Davis".to_string(),
            url: "https://blob/so-what.mp3".to_string(),
        };

        client_for(&server).insert(&record).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/addSong"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let record = NewSong {
            title: "X".to_string(),
            artist: "Y".to_string(),
            url: "https://blob/x.mp3".to_string(),
        };

        let err = client_for(&server).insert(&record).await.unwrap_err();
        assert!(matches!(err, ServiceError::Status(s) if s.as_u16() == 500));
    }
}
