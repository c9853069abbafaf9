pub mod convert;

use crate::item::convert::{BoolFromAny, CalendarDate};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};
use std::fmt;
use std::fmt::{Display, Formatter};

/// 원격 서비스가 다루는 레코드의 종류
///
/// # Description
/// 종류마다 고정된 리소스 경로를 가지며 조회/등록/수정/삭제 경로는 모두 이 경로로 시작한다.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntityKind {
    Genre,
    Shelf,
    Audience,
    Document,
    Book,
    Dvd,
    Periodical,
    Copy,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Genre,
        EntityKind::Shelf,
        EntityKind::Audience,
        EntityKind::Document,
        EntityKind::Book,
        EntityKind::Dvd,
        EntityKind::Periodical,
        EntityKind::Copy,
    ];

    /// 리소스 경로
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Genre => "genre",
            EntityKind::Shelf => "rayon",
            EntityKind::Audience => "public",
            EntityKind::Document => "document",
            EntityKind::Book => "livre",
            EntityKind::Dvd => "dvd",
            EntityKind::Periodical => "revue",
            EntityKind::Copy => "exemplaire",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// 원격 서비스에서 목록으로 읽을 수 있는 레코드
///
/// # Description
/// 레코드 타입마다 자신의 종류를 알고 있으므로 조회 경로와 역직렬화 규칙이 타입 하나로 결정된다.
pub trait Entity: DeserializeOwned {
    const KIND: EntityKind;
}

/// 장르/서가/이용 대상을 하나로 묶은 분류
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    id: String,
    label: String,
    kind: EntityKind,
}

impl Category {
    pub fn new(kind: EntityKind, id: String, label: String) -> Self {
        Self { id, label, kind }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// 분류 종류별 조회 결과. 읽은 직후 [`Category`] 로 변환된다.
macro_rules! category_row {
    ($name:ident, $kind:expr) => {
        #[serde_as]
        #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
        pub struct $name {
            pub id: String,

            #[serde(rename = "libelle", default)]
            #[serde_as(as = "DefaultOnNull")]
            pub label: String,
        }

        impl Entity for $name {
            const KIND: EntityKind = $kind;
        }

        impl From<$name> for Category {
            fn from(row: $name) -> Self {
                Category::new(<$name as Entity>::KIND, row.id, row.label)
            }
        }
    };
}

category_row!(Genre, EntityKind::Genre);
category_row!(Shelf, EntityKind::Shelf);
category_row!(Audience, EntityKind::Audience);

/// 모든 문서가 공유하는 서지 정보
///
/// 도서, DVD, 잡지 응답에는 빠져 있을 수 있으므로 모든 필드는 비어 있는 문자열이 기본값이다.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    #[serde(rename = "titre")]
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,

    #[serde_as(as = "DefaultOnNull")]
    pub image: String,

    #[serde(rename = "idRayon")]
    #[serde_as(as = "DefaultOnNull")]
    pub shelf_id: String,

    #[serde(rename = "idPublic")]
    #[serde_as(as = "DefaultOnNull")]
    pub audience_id: String,

    #[serde(rename = "idGenre")]
    #[serde_as(as = "DefaultOnNull")]
    pub genre_id: String,
}

/// 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    #[serde(flatten)]
    pub info: DocumentInfo,
}

impl Entity for Document {
    const KIND: EntityKind = EntityKind::Document;
}

/// 도서
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,

    #[serde(flatten)]
    pub info: DocumentInfo,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub isbn: String,

    #[serde(rename = "auteur", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub author: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub collection: String,
}

impl Entity for Book {
    const KIND: EntityKind = EntityKind::Book;
}

/// DVD
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dvd {
    pub id: String,

    #[serde(flatten)]
    pub info: DocumentInfo,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub synopsis: String,

    #[serde(rename = "realisateur", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub director: String,

    /// 상영 시간(분)
    #[serde(rename = "duree")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub duration: i32,
}

impl Entity for Dvd {
    const KIND: EntityKind = EntityKind::Dvd;
}

/// 잡지
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Periodical {
    pub id: String,

    #[serde(flatten)]
    pub info: DocumentInfo,

    #[serde(rename = "periodicite", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub periodicity: String,

    /// 입고 후 열람 가능해지기 까지의 기간
    #[serde(rename = "delaiMiseADispo")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub availability_delay: i32,
}

impl Entity for Periodical {
    const KIND: EntityKind = EntityKind::Periodical;
}

/// 잡지의 호(號)
///
/// # Note
/// `id` 는 상위 잡지의 아이디다. 잡지의 존재 여부는 원격 서비스가 확인한다.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalCopy {
    pub id: String,

    #[serde(rename = "numero")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub number: i32,

    #[serde(rename = "dateAchat")]
    #[serde_as(as = "CalendarDate")]
    pub arrival_date: NaiveDate,

    #[serde(rename = "etat")]
    #[serde_as(as = "BoolFromAny")]
    pub status: bool,
}

impl PeriodicalCopy {
    pub fn new(periodical_id: String, number: i32, arrival_date: NaiveDate, status: bool) -> Self {
        Self { id: periodical_id, number, arrival_date, status }
    }
}

impl Entity for PeriodicalCopy {
    const KIND: EntityKind = EntityKind::Copy;
}
