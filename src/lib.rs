pub mod config;
pub mod item;
pub mod provider;
pub mod repo;

pub use item::{Book, Category, Document, DocumentInfo, Dvd, Entity, EntityKind, Periodical, PeriodicalCopy};
pub use provider::http::HttpTransport;
pub use provider::{Method, Transport, TransportError};
pub use repo::envelope::{Reply, SUCCESS_CODE};
pub use repo::{CatalogRepository, ExitProcess, FatalPolicy, Propagate, RepoError};
