use serde_json::Value;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod http;

/// HTTP 동사. 서비스는 네 가지 동사만 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// 조회 동사 여부. 조회 응답만 `result` 를 목록으로 해석한다.
    pub fn is_read(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    InvalidBaseUrl(String),
    ClientBuildFailed(String),
    RequestFailed(String),
    ResponseTextExtractionFailed(String),
    ResponseParseFailed(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidBaseUrl(s) => write!(f, "Invalid base url: {}", s),
            TransportError::ClientBuildFailed(s) => write!(f, "Failed to build http client: {}", s),
            TransportError::RequestFailed(s) => write!(f, "Request failed: {}", s),
            TransportError::ResponseTextExtractionFailed(s) => write!(f, "Failed to read response body: {}", s),
            TransportError::ResponseParseFailed(s) => write!(f, "Failed to parse response: {}", s),
        }
    }
}

impl std::error::Error for TransportError {}

/// 원격 API와의 연결
///
/// # Description
/// 동사와 메시지(경로, 필요시 JSON 리터럴 포함)를 받아 서버가 돌려준 최상위 JSON 객체를 반환한다.
/// 연결과 인증 정보는 구현체가 소유한다.
pub trait Transport {
    fn call(&self, method: Method, message: &str) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, method: Method, message: &str) -> Result<Value, TransportError> {
        (**self).call(method, message)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&self, method: Method, message: &str) -> Result<Value, TransportError> {
        (**self).call(method, message)
    }
}
