pub mod envelope;
pub mod payload;

use crate::config;
use crate::item::{Audience, Book, Category, Document, Dvd, Entity, EntityKind, Genre, Periodical, PeriodicalCopy, Shelf};
use crate::provider::http::HttpTransport;
use crate::provider::{Method, Transport, TransportError};
use crate::repo::envelope::{Envelope, Reply};
use crate::repo::payload::JsonLiteral;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// 저장소에서 발생하는 에러 열거
///
/// 모두 연결 혹은 응답 형식의 문제이며, 서버가 실패 코드를 돌려준 경우는 에러가 아니다.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    /// 원격 API 와 통신하지 못함
    Transport(TransportError),

    /// 응답 최상위 객체의 형태가 올바르지 않음
    MalformedEnvelope(String),

    /// 결과 목록을 레코드로 변환하지 못함
    Decode(String),

    /// 요청 본문을 만들지 못함
    Encode(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Transport(e) => write!(f, "{}", e),
            RepoError::MalformedEnvelope(s) => write!(f, "Malformed response envelope: {}", s),
            RepoError::Decode(s) => write!(f, "Failed to decode result: {}", s),
            RepoError::Encode(s) => write!(f, "Failed to encode payload: {}", s),
        }
    }
}

impl std::error::Error for RepoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepoError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for RepoError {
    fn from(value: TransportError) -> Self {
        RepoError::Transport(value)
    }
}

/// 통신/응답 형식 에러를 만났을 때의 처리 방침
///
/// # Description
/// 저장소는 에러를 호출자에게 돌려주기 전에 방침에 먼저 알린다.
/// 기본 방침인 [`ExitProcess`] 는 프로세스를 종료하므로 호출자는 에러를 받지 못한다.
pub trait FatalPolicy {
    fn escalate(&self, error: &RepoError);
}

/// 프로세스를 종료한다. 에러는 저장소가 이미 기록했다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitProcess {
    code: i32,
}

impl ExitProcess {
    pub const DEFAULT_CODE: i32 = 1;

    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl Default for ExitProcess {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CODE)
    }
}

impl FatalPolicy for ExitProcess {
    fn escalate(&self, _: &RepoError) {
        std::process::exit(self.code);
    }
}

/// 에러를 호출자에게 그대로 돌려준다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagate;

impl FatalPolicy for Propagate {
    fn escalate(&self, _: &RepoError) {}
}

static INSTANCE: OnceLock<CatalogRepository> = OnceLock::new();

/// 카탈로그 저장소
///
/// # Description
/// 종류별 조회와 등록/수정/삭제를 원격 API 호출 하나로 변환한다.
/// 조회는 서버가 실패 코드를 돌려줘도 빈 목록을 반환하므로 "결과 없음"과 구별하려면 [`CatalogRepository::fetch`] 를 사용한다.
/// 등록/수정/삭제는 서버가 성공 코드를 돌려줬을 때만 `true` 다.
///
/// # Note
/// 내부에 잠금이 없다. 여러 스레드에서 동시에 호출하면 요청 순서는 보장되지 않는다.
pub struct CatalogRepository<T: Transport = HttpTransport> {
    transport: T,
    policy: Box<dyn FatalPolicy + Send + Sync>,
}

impl CatalogRepository<HttpTransport> {
    /// 설정으로 HTTP 연결을 만든다. 에러 방침은 설정의 종료 코드를 사용하는 [`ExitProcess`] 다.
    pub fn connect(api: &config::api::Config) -> Result<Self, RepoError> {
        let transport = HttpTransport::with_timeout(api.base_url(), api.username(), api.password(), api.timeout())?;
        info!(base_url = transport.base_url().as_str(), "catalogue API client created");

        Ok(Self::new(transport, ExitProcess::new(api.exit_code())))
    }

    /// 프로세스 전역 저장소
    ///
    /// 처음 호출될 때 설정을 읽어 연결을 만든다. 설정을 읽지 못하거나 연결을 만들지 못하면 프로세스를 종료한다.
    pub fn instance() -> &'static Self {
        INSTANCE.get_or_init(|| {
            let connected = config::load()
                .map_err(|e| e.to_string())
                .and_then(|c| Self::connect(c.api()).map_err(|e| e.to_string()));

            match connected {
                Ok(repository) => repository,
                Err(e) => {
                    error!(error = e.as_str(), "cannot create the catalogue API client, terminating");
                    std::process::exit(ExitProcess::DEFAULT_CODE)
                }
            }
        })
    }
}

impl<T: Transport> CatalogRepository<T> {
    pub fn new<P>(transport: T, policy: P) -> Self
    where
        P: FatalPolicy + Send + Sync + 'static
    {
        Self { transport, policy: Box::new(policy) }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn genres(&self) -> Result<Vec<Category>, RepoError> {
        self.categories::<Genre>()
    }

    pub fn shelves(&self) -> Result<Vec<Category>, RepoError> {
        self.categories::<Shelf>()
    }

    pub fn audiences(&self) -> Result<Vec<Category>, RepoError> {
        self.categories::<Audience>()
    }

    pub fn books(&self) -> Result<Vec<Book>, RepoError> {
        self.read_all(None)
    }

    pub fn dvds(&self) -> Result<Vec<Dvd>, RepoError> {
        self.read_all(None)
    }

    pub fn periodicals(&self) -> Result<Vec<Periodical>, RepoError> {
        self.read_all(None)
    }

    pub fn documents(&self, id: &str) -> Result<Vec<Document>, RepoError> {
        self.read_all(Some(id))
    }

    pub fn copies_of(&self, periodical_id: &str) -> Result<Vec<PeriodicalCopy>, RepoError> {
        self.read_all(Some(periodical_id))
    }

    /// 서버의 성공/실패를 그대로 담아 조회한다.
    pub fn fetch<E: Entity>(&self, id: Option<&str>) -> Result<Reply<E>, RepoError> {
        let envelope = self.exchange(Method::Get, &payload::read_path(E::KIND, id))?;
        self.escalate(envelope.into_reply::<E>(Method::Get))
    }

    pub fn create_document(&self, document: &Document) -> Result<bool, RepoError> {
        let body = JsonLiteral::new()
            .field("id", &document.id)
            .field("titre", &document.info.title)
            .field("image", &document.info.image)
            .field("idRayon", &document.info.shelf_id)
            .field("idPublic", &document.info.audience_id)
            .field("idGenre", &document.info.genre_id);

        self.submit(Method::Post, &payload::create_path(EntityKind::Document, &body.render()))
    }

    pub fn update_document(&self, document: &Document) -> Result<bool, RepoError> {
        let body = JsonLiteral::new()
            .field("id", &document.id)
            .field("titre", &document.info.title)
            .field("image", &document.info.image)
            .field("idGenre", &document.info.genre_id)
            .field("idPublic", &document.info.audience_id)
            .field("idRayon", &document.info.shelf_id);

        self.submit(Method::Put, &payload::update_path(EntityKind::Document, &document.id, &body.render()))
    }

    pub fn delete_document(&self, id: &str) -> Result<bool, RepoError> {
        self.submit(Method::Delete, &payload::delete_path(EntityKind::Document, id))
    }

    pub fn create_book(&self, book: &Book) -> Result<bool, RepoError> {
        self.submit(Method::Post, &payload::create_path(EntityKind::Book, &book_literal(book).render()))
    }

    pub fn update_book(&self, book: &Book) -> Result<bool, RepoError> {
        self.submit(Method::Put, &payload::update_path(EntityKind::Book, &book.id, &book_literal(book).render()))
    }

    pub fn delete_book(&self, id: &str) -> Result<bool, RepoError> {
        self.submit(Method::Delete, &payload::delete_path(EntityKind::Book, id))
    }

    pub fn create_dvd(&self, dvd: &Dvd) -> Result<bool, RepoError> {
        self.submit(Method::Post, &payload::create_path(EntityKind::Dvd, &dvd_literal(dvd).render()))
    }

    pub fn update_dvd(&self, dvd: &Dvd) -> Result<bool, RepoError> {
        self.submit(Method::Put, &payload::update_path(EntityKind::Dvd, &dvd.id, &dvd_literal(dvd).render()))
    }

    pub fn delete_dvd(&self, id: &str) -> Result<bool, RepoError> {
        self.submit(Method::Delete, &payload::delete_path(EntityKind::Dvd, id))
    }

    pub fn create_periodical(&self, periodical: &Periodical) -> Result<bool, RepoError> {
        let body = periodical_literal(periodical).render();
        self.submit(Method::Post, &payload::create_path(EntityKind::Periodical, &body))
    }

    pub fn update_periodical(&self, periodical: &Periodical) -> Result<bool, RepoError> {
        let body = periodical_literal(periodical).render();
        self.submit(Method::Put, &payload::update_path(EntityKind::Periodical, &periodical.id, &body))
    }

    pub fn delete_periodical(&self, id: &str) -> Result<bool, RepoError> {
        self.submit(Method::Delete, &payload::delete_path(EntityKind::Periodical, id))
    }

    /// 잡지의 호를 등록한다. 본문은 날짜(`YYYY-MM-DD`)와 불리언을 그대로 담은 JSON 이다.
    pub fn create_copy(&self, copy: &PeriodicalCopy) -> Result<bool, RepoError> {
        let body = self.escalate(
            serde_json::to_string(copy).map_err(|e| RepoError::Encode(e.to_string()))
        )?;

        self.submit(Method::Post, &payload::create_path(EntityKind::Copy, &body))
    }

    fn categories<C>(&self) -> Result<Vec<Category>, RepoError>
    where
        C: Entity + Into<Category>
    {
        let rows = self.read_all::<C>(None)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn read_all<E: Entity>(&self, id: Option<&str>) -> Result<Vec<E>, RepoError> {
        self.fetch::<E>(id).map(Reply::into_rows)
    }

    fn submit(&self, method: Method, message: &str) -> Result<bool, RepoError> {
        self.exchange(method, message).map(|envelope| envelope.is_success())
    }

    fn exchange(&self, method: Method, message: &str) -> Result<Envelope, RepoError> {
        debug!(method = method.as_str(), path = message, "calling catalogue API");

        let envelope = self.escalate(
            self.transport.call(method, message)
                .map_err(RepoError::from)
                .and_then(Envelope::try_from)
        )?;

        if !envelope.is_success() {
            warn!(
                method = method.as_str(),
                code = envelope.code(),
                reason = envelope.message().unwrap_or_default(),
                "catalogue API rejected the request"
            );
        }
        Ok(envelope)
    }

    fn escalate<V>(&self, result: Result<V, RepoError>) -> Result<V, RepoError> {
        if let Err(e) = &result {
            error!(error = %e, "catalogue API call failed, escalating");
            self.policy.escalate(e);
        }
        result
    }
}

fn book_literal(book: &Book) -> JsonLiteral {
    JsonLiteral::new()
        .field("id", &book.id)
        .field("isbn", &book.isbn)
        .field("auteur", &book.author)
        .field("collection", &book.collection)
}

fn dvd_literal(dvd: &Dvd) -> JsonLiteral {
    JsonLiteral::new()
        .field("id", &dvd.id)
        .field("synopsis", &dvd.synopsis)
        .field("realisateur", &dvd.director)
        .field("duree", dvd.duration)
}

fn periodical_literal(periodical: &Periodical) -> JsonLiteral {
    JsonLiteral::new()
        .field("id", &periodical.id)
        .field("periodicite", &periodical.periodicity)
        .field("delaiMiseADispo", periodical.availability_delay)
}
