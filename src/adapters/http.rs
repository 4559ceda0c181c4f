use crate::domain::model::PostalCode;
use crate::domain::ports::{AddressLookup, ConfigProvider};
use crate::utils::error::LookupError;
use crate::utils::validation::CEP_PLACEHOLDER;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://viacep.com.br/ws/{cep}/json/";

/// ViaCEP-style lookup client. The endpoint is a template with a `{cep}` slot.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    endpoint_template: String,
    timeout: Option<Duration>,
}

impl ViaCepClient {
    pub fn new(endpoint_template: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint_template: endpoint_template.into(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let client = Self::new(config.api_endpoint());
        match config.timeout_seconds() {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 將 CEP 編碼成單一路徑片段後代入模板，不做格式檢查
    pub fn url_for(&self, code: &PostalCode) -> Result<Url, LookupError> {
        let raw = self
            .endpoint_template
            .replace(CEP_PLACEHOLDER, &encode_path_segment(code.as_str()));
        Url::parse(&raw).map_err(|e| LookupError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

/// `.` and `..` survive percent-encoding but would be collapsed by URL parsing.
fn encode_path_segment(code: &str) -> String {
    let encoded = urlencoding::encode(code).into_owned();
    if encoded == "." || encoded == ".." {
        encoded.replace('.', "%2E")
    } else {
        encoded
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait::async_trait]
impl AddressLookup for ViaCepClient {
    async fn fetch(&self, code: &PostalCode) -> Result<serde_json::Value, LookupError> {
        let url = self.url_for(code)?;
        tracing::debug!("Making lookup request to: {}", url);

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Lookup response status: {}", status);

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LookupError::MalformedResponse {
            reason: format!("invalid JSON body: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> ViaCepClient {
        ViaCepClient::new(format!("{}/ws/{{cep}}/json/", server.base_url()))
    }

    #[test]
    fn test_url_for_substitutes_code_verbatim() {
        let client = ViaCepClient::default();
        let url = client.url_for(&PostalCode::from("01310-100")).unwrap();
        assert_eq!(url.as_str(), "https://viacep.com.br/ws/01310-100/json/");
    }

    #[test]
    fn test_url_for_keeps_reserved_characters_inside_the_path() {
        let client = ViaCepClient::default();

        let url = client.url_for(&PostalCode::from("01310-100#x")).unwrap();
        assert_eq!(url.path(), "/ws/01310-100%23x/json/");
        assert_eq!(url.fragment(), None);

        let url = client.url_for(&PostalCode::from("01310?a=1")).unwrap();
        assert_eq!(url.path(), "/ws/01310%3Fa%3D1/json/");
        assert_eq!(url.query(), None);

        let url = client.url_for(&PostalCode::from("../../01310-100")).unwrap();
        assert_eq!(url.path(), "/ws/..%2F..%2F01310-100/json/");

        let url = client.url_for(&PostalCode::from("..")).unwrap();
        assert_eq!(url.path(), "/ws/%2E%2E/json/");

        let url = client.url_for(&PostalCode::from("01310 100")).unwrap();
        assert_eq!(url.path(), "/ws/01310%20100/json/");
    }

    #[tokio::test]
    async fn test_fetch_requests_encoded_path_segment() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01310-100%23x/json/");
            then.status(400).body("Bad Request");
        });

        let err = client_for(&server)
            .fetch(&PostalCode::from("01310-100#x"))
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(err, LookupError::Status { status: 400 }));
    }

    #[test]
    fn test_url_for_rejects_broken_template() {
        let client = ViaCepClient::new("not a url/{cep}");
        let err = client.url_for(&PostalCode::from("01310100")).unwrap_err();
        assert!(matches!(err, LookupError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_payload() {
        let server = MockServer::start();
        let body = serde_json::json!({
            "cep": "01310-100",
            "logradouro": "Av. Paulista",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        });

        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01310-100/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body.clone());
        });

        let payload = client_for(&server)
            .fetch(&PostalCode::from("01310-100"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(payload, body);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/abc/json/");
            then.status(400).body("<h1>Bad Request</h1>");
        });

        let err = client_for(&server)
            .fetch(&PostalCode::from("abc"))
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(err, LookupError::Status { status: 400 }));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_malformed() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01310100/json/");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = client_for(&server)
            .fetch(&PostalCode::from("01310100"))
            .await
            .unwrap_err();

        api_mock.assert();
        assert!(matches!(err, LookupError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start();
        let _slow = server.mock(|when, then| {
            when.method(GET).path("/ws/01310100/json/");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"uf": "SP"}));
        });

        let err = client_for(&server)
            .with_timeout(Duration::from_millis(200))
            .fetch(&PostalCode::from("01310100"))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Timeout));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        let client = ViaCepClient::new("http://127.0.0.1:1/ws/{cep}/json/");
        let err = client
            .fetch(&PostalCode::from("01310100"))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Network(_)));
    }
}
