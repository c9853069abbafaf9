use crate::provider::{Method, Transport, TransportError};
use reqwest::{blocking, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// API 요청의 기본 타임아웃 시간(초)
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// 기본 인증을 사용하는 HTTP 연결
///
/// # Description
/// 요청 URL 은 `base_url` 뒤에 메시지를 그대로 붙여 만든다.
/// 서비스는 실패도 응답 본문의 코드로 알려주므로 HTTP 상태와 관계 없이 본문을 JSON 으로 해석한다.
pub struct HttpTransport {
    client: blocking::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, username, password, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let base_url = parse_base_url(base_url)?;
        let client = blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ClientBuildFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request_url(&self, message: &str) -> Result<Url, TransportError> {
        let full = format!("{}{}", self.base_url.as_str(), message.trim_start_matches('/'));
        Url::parse(&full).map_err(|e| TransportError::RequestFailed(format!("invalid request url {}: {}", full, e)))
    }
}

impl Transport for HttpTransport {
    fn call(&self, method: Method, message: &str) -> Result<Value, TransportError> {
        let url = self.request_url(message)?;
        debug!("{} {}", method, url.path());

        let response = self.client
            .request(method.into(), url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| TransportError::RequestFailed(format!("{} {}: {}", method, message, e)))?;

        let status = response.status();
        let text = response.text()
            .map_err(|e| TransportError::ResponseTextExtractionFailed(e.to_string()))?;
        trace!(status = status.as_u16(), "response received");

        let value = serde_json::from_str::<Value>(&text)
            .map_err(|e| TransportError::ResponseParseFailed(format!("HTTP {}: {}", status, e)))?;

        if value.is_object() {
            Ok(value)
        } else {
            Err(TransportError::ResponseParseFailed(format!("HTTP {}: response is not a JSON object", status)))
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized).map_err(|e| TransportError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(TransportError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(url)
}
