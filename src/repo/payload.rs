use crate::item::EntityKind;
use std::fmt::Display;
use tracing::warn;

/// 요청 경로에 그대로 들어가는 JSON 객체 리터럴
///
/// # Description
/// 서비스가 받는 형태(`{ "id" : "D1", "duree" : "120"}`)를 그대로 만든다.
/// 값은 숫자도 항상 따옴표로 감싸며 이스케이프 하지 않는다.
///
/// # Note
/// 따옴표나 역슬래시가 들어간 값은 리터럴을 깨트린다. 값은 바꾸지 않고 경고만 남긴다.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonLiteral {
    fields: Vec<(&'static str, String)>,
}

impl JsonLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<V: Display>(mut self, name: &'static str, value: V) -> Self {
        let value = value.to_string();
        if corrupts_literal(&value) {
            warn!(field = name, value = value.as_str(), "value is not escaped and will corrupt the request payload");
        }
        self.fields.push((name, value));
        self
    }

    pub fn render(&self) -> String {
        let pairs = self.fields.iter()
            .map(|(name, value)| format!("\"{}\" : \"{}\"", name, value))
            .collect::<Vec<_>>();

        format!("{{ {}}}", pairs.join(", "))
    }
}

impl Display for JsonLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn corrupts_literal(value: &str) -> bool {
    value.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

/// 조회 경로: `<resource>` 또는 `<resource>/<id>`
pub fn read_path(kind: EntityKind, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}/{}", kind.resource(), id),
        None => kind.resource().to_owned(),
    }
}

/// 등록 경로: `<resource>/<json>`
pub fn create_path(kind: EntityKind, body: &str) -> String {
    format!("{}/{}", kind.resource(), body)
}

/// 수정 경로: `<resource>/<id>/<json>`
pub fn update_path(kind: EntityKind, id: &str, body: &str) -> String {
    format!("{}/{}/{}", kind.resource(), id, body)
}

/// 삭제 경로: `<resource>/{ "id" : "<id>"}`
pub fn delete_path(kind: EntityKind, id: &str) -> String {
    create_path(kind, &JsonLiteral::new().field("id", id).render())
}
