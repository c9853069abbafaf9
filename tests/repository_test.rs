// Integration tests for `CatalogRepository` using a recording transport.

use chrono::NaiveDate;
use mediatek_catalog::item::Genre;
use mediatek_catalog::{
    Book, CatalogRepository, Document, DocumentInfo, Dvd, EntityKind, FatalPolicy, Method, Periodical,
    PeriodicalCopy, Propagate, RepoError, Reply, Transport, TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MockTransport {
    replies: RefCell<VecDeque<Result<Value, TransportError>>>,
    calls: RefCell<Vec<(Method, String)>>,
}

impl MockTransport {
    fn replying(reply: Result<Value, TransportError>) -> Self {
        let mock = Self::default();
        mock.replies.borrow_mut().push_back(reply);
        mock
    }

    fn ok(value: Value) -> Self {
        Self::replying(Ok(value))
    }

    fn calls(&self) -> Vec<(Method, String)> {
        self.calls.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn call(&self, method: Method, message: &str) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push((method, message.to_owned()));
        self.replies.borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::RequestFailed("no reply queued".to_owned())))
    }
}

#[derive(Clone, Default)]
struct RecordingPolicy {
    escalated: Arc<Mutex<Vec<RepoError>>>,
}

impl FatalPolicy for RecordingPolicy {
    fn escalate(&self, error: &RepoError) {
        self.escalated.lock().unwrap().push(error.clone());
    }
}

fn repository(transport: MockTransport) -> CatalogRepository<MockTransport> {
    CatalogRepository::new(transport, Propagate)
}

fn success() -> Value {
    json!({ "code": "200", "message": "OK", "result": [] })
}

fn rejected() -> Value {
    json!({ "code": "400", "message": "requete invalide", "result": null })
}

fn sample_dvd() -> Dvd {
    Dvd {
        id: "D1".to_owned(),
        info: DocumentInfo::default(),
        synopsis: "Test".to_owned(),
        director: "X".to_owned(),
        duration: 120,
    }
}

// ── Reads ───────────────────────────────────────────────────────────

#[test]
fn get_all_books_decodes_exact_fields() {
    let repo = repository(MockTransport::ok(json!({
        "code": "200",
        "result": [{ "id": "L1", "isbn": "123", "auteur": "A", "collection": "C" }]
    })));

    let books = repo.books().unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, "L1");
    assert_eq!(books[0].isbn, "123");
    assert_eq!(books[0].author, "A");
    assert_eq!(books[0].collection, "C");
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "livre".to_owned())]);
}

#[test]
fn null_text_fields_do_not_fail_the_read() {
    let repo = repository(MockTransport::ok(json!({
        "code": "200",
        "result": [{ "id": "L1", "isbn": null, "auteur": "A", "collection": "C" }]
    })));
    repo.transport().replies.borrow_mut().push_back(Ok(json!({
        "code": "200",
        "result": [{ "id": "D1", "titre": "Dune", "synopsis": null, "realisateur": null, "duree": "155" }]
    })));

    let books = repo.books().unwrap();
    let dvds = repo.dvds().unwrap();

    assert_eq!(books[0].isbn, "");
    assert_eq!(books[0].author, "A");
    assert_eq!(dvds[0].info.title, "Dune");
    assert_eq!(dvds[0].synopsis, "");
    assert_eq!(dvds[0].director, "");
    assert_eq!(dvds[0].duration, 155);
}

#[test]
fn read_of_n_rows_yields_n_records() {
    let repo = repository(MockTransport::ok(json!({
        "code": "200",
        "result": [
            { "id": "10001", "titre": "Arts Magazine", "image": "", "idRayon": "PR002", "idPublic": "00002",
              "idGenre": "10016", "periodicite": "MS", "delaiMiseADispo": 52 },
            { "id": "10002", "titre": "Alternatives Economiques", "image": null, "idRayon": "PR002",
              "idPublic": "00002", "idGenre": "10015", "periodicite": "MS", "delaiMiseADispo": "52" },
            { "id": "10003", "titre": "Challenges", "idRayon": "PR001", "idPublic": "00002",
              "idGenre": "10015", "periodicite": "HB", "delaiMiseADispo": "26" }
        ]
    })));

    let periodicals = repo.periodicals().unwrap();

    assert_eq!(periodicals.len(), 3);
    assert_eq!(periodicals[0].info.title, "Arts Magazine");
    assert_eq!(periodicals[1].availability_delay, 52);
    assert_eq!(periodicals[1].info.image, "");
    assert_eq!(periodicals[2].periodicity, "HB");
    assert_eq!(periodicals[2].info.image, "");
}

#[test]
fn categories_are_tagged_with_their_kind() {
    let rows = json!({
        "code": "200",
        "result": [{ "id": "00001", "libelle": "Jeunesse" }, { "id": "00002", "libelle": "Adultes" }]
    });

    let repo = repository(MockTransport::ok(rows.clone()));
    let audiences = repo.audiences().unwrap();
    assert_eq!(audiences.len(), 2);
    assert!(audiences.iter().all(|c| c.kind() == EntityKind::Audience));
    assert_eq!(audiences[1].label(), "Adultes");
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "public".to_owned())]);

    let repo = repository(MockTransport::ok(rows.clone()));
    assert!(repo.genres().unwrap().iter().all(|c| c.kind() == EntityKind::Genre));
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "genre".to_owned())]);

    let repo = repository(MockTransport::ok(rows));
    assert!(repo.shelves().unwrap().iter().all(|c| c.kind() == EntityKind::Shelf));
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "rayon".to_owned())]);
}

#[test]
fn reads_by_id_append_the_id() {
    let repo = repository(MockTransport::ok(json!({
        "code": "200",
        "result": [{ "id": "00017", "titre": "Catastrophes au Brésil", "image": "",
                     "idRayon": "LV001", "idPublic": "00002", "idGenre": "10014" }]
    })));
    let documents = repo.documents("00017").unwrap();
    assert_eq!(documents[0].info.genre_id, "10014");
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "document/00017".to_owned())]);

    let repo = repository(MockTransport::ok(json!({
        "code": "200",
        "result": [
            { "id": "10002", "numero": "418", "dateAchat": "2021-12-01 00:00:00", "etat": "1" },
            { "id": "10002", "numero": 419, "dateAchat": "2022-01-01", "etat": false }
        ]
    })));
    let copies = repo.copies_of("10002").unwrap();
    assert_eq!(copies, vec![
        PeriodicalCopy::new("10002".to_owned(), 418, NaiveDate::from_ymd_opt(2021, 12, 1).unwrap(), true),
        PeriodicalCopy::new("10002".to_owned(), 419, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), false),
    ]);
    assert_eq!(repo.transport().calls(), vec![(Method::Get, "exemplaire/10002".to_owned())]);
}

#[test]
fn empty_result_is_an_empty_sequence() {
    let repo = repository(MockTransport::ok(success()));
    assert!(repo.dvds().unwrap().is_empty());
}

#[test]
fn rejected_read_is_indistinguishable_from_empty() {
    let repo = repository(MockTransport::ok(rejected()));
    assert!(repo.books().unwrap().is_empty());
}

#[test]
fn fetch_keeps_the_rejection() {
    let repo = repository(MockTransport::ok(rejected()));

    let reply = repo.fetch::<Genre>(None).unwrap();

    assert_eq!(reply, Reply::Rejected { code: "400".to_owned(), message: "requete invalide".to_owned() });
}

// ── Writes ──────────────────────────────────────────────────────────

#[test]
fn create_dvd_sends_literal_payload() {
    let repo = repository(MockTransport::ok(success()));

    assert!(repo.create_dvd(&sample_dvd()).unwrap());
    assert_eq!(repo.transport().calls(), vec![(
        Method::Post,
        r#"dvd/{ "id" : "D1", "synopsis" : "Test", "realisateur" : "X", "duree" : "120"}"#.to_owned(),
    )]);
}

#[test]
fn write_returns_false_when_rejected() {
    let repo = repository(MockTransport::ok(rejected()));
    assert!(!repo.create_dvd(&sample_dvd()).unwrap());

    let repo = repository(MockTransport::ok(json!({ "code": "500", "message": "erreur serveur" })));
    assert!(!repo.delete_book("L1").unwrap());
}

#[test]
fn update_and_delete_paths() {
    let repo = repository(MockTransport::ok(success()));
    let dvd = Dvd { duration: 95, ..sample_dvd() };
    assert!(repo.update_dvd(&dvd).unwrap());
    assert_eq!(repo.transport().calls()[0], (
        Method::Put,
        r#"dvd/D1/{ "id" : "D1", "synopsis" : "Test", "realisateur" : "X", "duree" : "95"}"#.to_owned(),
    ));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.delete_dvd("D1").unwrap());
    assert_eq!(repo.transport().calls()[0], (Method::Delete, r#"dvd/{ "id" : "D1"}"#.to_owned()));
}

#[test]
fn document_payloads() {
    let document = Document {
        id: "00042".to_owned(),
        info: DocumentInfo {
            title: "Le Seigneur des anneaux".to_owned(),
            image: "img.png".to_owned(),
            shelf_id: "LV002".to_owned(),
            audience_id: "00002".to_owned(),
            genre_id: "10002".to_owned(),
        },
    };

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.create_document(&document).unwrap());
    assert_eq!(repo.transport().calls()[0], (
        Method::Post,
        concat!(
            r#"document/{ "id" : "00042", "titre" : "Le Seigneur des anneaux", "image" : "img.png", "#,
            r#""idRayon" : "LV002", "idPublic" : "00002", "idGenre" : "10002"}"#
        ).to_owned(),
    ));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.update_document(&document).unwrap());
    assert_eq!(repo.transport().calls()[0], (
        Method::Put,
        concat!(
            r#"document/00042/{ "id" : "00042", "titre" : "Le Seigneur des anneaux", "image" : "img.png", "#,
            r#""idGenre" : "10002", "idPublic" : "00002", "idRayon" : "LV002"}"#
        ).to_owned(),
    ));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.delete_document("00042").unwrap());
    assert_eq!(repo.transport().calls()[0], (Method::Delete, r#"document/{ "id" : "00042"}"#.to_owned()));
}

#[test]
fn book_and_periodical_payloads() {
    let book = Book {
        id: "00001".to_owned(),
        info: DocumentInfo::default(),
        isbn: "1234569877896".to_owned(),
        author: "Fred Vargas".to_owned(),
        collection: "Commissaire Adamsberg".to_owned(),
    };
    let repo = repository(MockTransport::ok(success()));
    assert!(repo.create_book(&book).unwrap());
    assert_eq!(repo.transport().calls()[0], (
        Method::Post,
        r#"livre/{ "id" : "00001", "isbn" : "1234569877896", "auteur" : "Fred Vargas", "collection" : "Commissaire Adamsberg"}"#.to_owned(),
    ));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.update_book(&book).unwrap());
    assert!(repo.transport().calls()[0].1.starts_with(r#"livre/00001/{ "id" : "00001", "isbn""#));

    let periodical = Periodical {
        id: "10001".to_owned(),
        info: DocumentInfo::default(),
        periodicity: "MS".to_owned(),
        availability_delay: 52,
    };
    let repo = repository(MockTransport::ok(success()));
    assert!(repo.create_periodical(&periodical).unwrap());
    assert_eq!(repo.transport().calls()[0], (
        Method::Post,
        r#"revue/{ "id" : "10001", "periodicite" : "MS", "delaiMiseADispo" : "52"}"#.to_owned(),
    ));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.update_periodical(&periodical).unwrap());
    assert_eq!(repo.transport().calls()[0].0, Method::Put);
    assert!(repo.transport().calls()[0].1.starts_with("revue/10001/{ "));

    let repo = repository(MockTransport::ok(success()));
    assert!(repo.delete_periodical("10001").unwrap());
    assert_eq!(repo.transport().calls()[0], (Method::Delete, r#"revue/{ "id" : "10001"}"#.to_owned()));
}

#[test]
fn create_copy_serializes_native_values() {
    let repo = repository(MockTransport::ok(success()));
    let copy = PeriodicalCopy::new("10002".to_owned(), 420, NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(), false);

    assert!(repo.create_copy(&copy).unwrap());
    assert_eq!(repo.transport().calls(), vec![(
        Method::Post,
        r#"exemplaire/{"id":"10002","numero":420,"dateAchat":"2022-02-01","etat":false}"#.to_owned(),
    )]);
}

// ── Fatal path ──────────────────────────────────────────────────────

#[test]
fn transport_fault_is_escalated_on_read() {
    let policy = RecordingPolicy::default();
    let fault = TransportError::RequestFailed("connection refused".to_owned());
    let repo = CatalogRepository::new(MockTransport::replying(Err(fault.clone())), policy.clone());

    let result = repo.books();

    assert_eq!(result, Err(RepoError::Transport(fault.clone())));
    assert_eq!(*policy.escalated.lock().unwrap(), vec![RepoError::Transport(fault)]);
}

#[test]
fn transport_fault_is_escalated_on_write() {
    let policy = RecordingPolicy::default();
    let fault = TransportError::ResponseParseFailed("expected value at line 1 column 1".to_owned());
    let repo = CatalogRepository::new(MockTransport::replying(Err(fault)), policy.clone());

    let result = repo.create_dvd(&sample_dvd());

    assert!(matches!(result, Err(RepoError::Transport(TransportError::ResponseParseFailed(_)))));
    assert_eq!(policy.escalated.lock().unwrap().len(), 1);
}

#[test]
fn malformed_rows_are_escalated() {
    let policy = RecordingPolicy::default();
    let repo = CatalogRepository::new(MockTransport::ok(json!({
        "code": "200",
        "result": [{ "id": "10002", "numero": 1, "dateAchat": "2022-01-01", "etat": "oui" }]
    })), policy.clone());

    let result = repo.copies_of("10002");

    assert!(matches!(result, Err(RepoError::Decode(_))));
    assert_eq!(policy.escalated.lock().unwrap().len(), 1);
}

#[test]
fn missing_code_is_escalated() {
    let policy = RecordingPolicy::default();
    let repo = CatalogRepository::new(MockTransport::ok(json!({ "result": [] })), policy.clone());

    assert!(matches!(repo.delete_document("1"), Err(RepoError::MalformedEnvelope(_))));
    assert_eq!(policy.escalated.lock().unwrap().len(), 1);
}

#[test]
fn rejection_is_not_escalated() {
    let policy = RecordingPolicy::default();
    let repo = CatalogRepository::new(MockTransport::ok(rejected()), policy.clone());

    assert_eq!(repo.delete_dvd("D1"), Ok(false));
    assert!(policy.escalated.lock().unwrap().is_empty());
}

#[derive(Clone)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn escalated_fault_is_logged_once() {
    let buffer = LogBuffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let policy = RecordingPolicy::default();
    let fault = TransportError::RequestFailed("connection refused".to_owned());
    let repo = CatalogRepository::new(MockTransport::replying(Err(fault)), policy.clone());

    let result = tracing::subscriber::with_default(subscriber, || repo.genres());

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(result.is_err());
    assert_eq!(policy.escalated.lock().unwrap().len(), 1);
    assert_eq!(logs.lines().filter(|line| line.contains("ERROR")).count(), 1);
}
