use crate::item::Entity;
use crate::provider::Method;
use crate::repo::RepoError;
use serde_json::Value;

/// 요청이 성공 했을 때 서버가 돌려주는 코드
pub const SUCCESS_CODE: &str = "200";

/// 서버 응답의 최상위 객체
///
/// # Description
/// 모든 응답은 `{"code": "200", "message": "...", "result": [...]}` 형태로 온다.
/// 코드는 문자열이지만 숫자로 오는 경우도 받아들인다.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    code: String,
    message: Option<String>,
    result: Option<Value>,
}

impl Envelope {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// 응답을 호출자에게 돌려줄 결과로 변환한다.
    ///
    /// 실패 코드는 [`Reply::Rejected`] 가 되고, 조회가 아닌 요청의 성공은 빈 목록이 된다.
    /// 조회 요청의 성공은 `result` 를 `E` 의 목록으로 역직렬화 한다.
    pub fn into_reply<E: Entity>(self, method: Method) -> Result<Reply<E>, RepoError> {
        if !self.is_success() {
            return Ok(Reply::Rejected {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        if !method.is_read() {
            return Ok(Reply::Rows(Vec::new()));
        }

        map_rows::<E>(self.result.unwrap_or(Value::Null)).map(Reply::Rows)
    }
}

impl TryFrom<Value> for Envelope {
    type Error = RepoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut object) = value else {
            return Err(RepoError::MalformedEnvelope("response is not a JSON object".to_owned()));
        };

        let code = match object.remove("code") {
            Some(Value::String(code)) => code,
            Some(Value::Number(code)) => code.to_string(),
            Some(other) => return Err(RepoError::MalformedEnvelope(format!("unexpected code: {}", other))),
            None => return Err(RepoError::MalformedEnvelope("missing code".to_owned())),
        };

        let message = match object.remove("message") {
            Some(Value::String(message)) => Some(message),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            code,
            message,
            result: object.remove("result"),
        })
    }
}

/// 원격 요청의 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<E> {
    /// 성공. 조회가 아닌 요청은 항상 빈 목록이다.
    Rows(Vec<E>),

    /// 서버가 실패 코드를 돌려줌
    Rejected { code: String, message: String },
}

impl<E> Reply<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Rows(_))
    }

    /// 목록을 꺼낸다. 실패 응답은 빈 목록이 되므로 "결과 없음"과 구별 되지 않는다.
    pub fn into_rows(self) -> Vec<E> {
        match self {
            Reply::Rows(rows) => rows,
            Reply::Rejected { .. } => Vec::new(),
        }
    }
}

/// `result` 값을 `E` 의 목록으로 변환한다.
///
/// # Description
/// 배열은 원소 순서 그대로, 단일 객체는 원소 하나짜리 목록으로, `null` 은 빈 목록으로 변환된다.
/// 원소 하나라도 변환에 실패하면 전체가 실패한다.
pub fn map_rows<E: Entity>(result: Value) -> Result<Vec<E>, RepoError> {
    let rows = match result {
        Value::Array(rows) => rows,
        Value::Null => return Ok(Vec::new()),
        object @ Value::Object(_) => vec![object],
        other => return Err(RepoError::Decode(format!("{}: expected an array, got {}", E::KIND, other))),
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value::<E>(row)
                .map_err(|e| RepoError::Decode(format!("{} row {}: {}", E::KIND, index, e)))
        })
        .collect()
}

/// JSON 배열 문자열을 `E` 의 목록으로 변환한다.
pub fn map_collection<E: Entity>(text: &str) -> Result<Vec<E>, RepoError> {
    let value = serde_json::from_str::<Value>(text)
        .map_err(|e| RepoError::Decode(format!("{}: {}", E::KIND, e)))?;
    map_rows(value)
}
