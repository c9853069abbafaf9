use chrono::NaiveDate;
use serde::de::{Unexpected, Visitor};
use serde::{Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};
use std::fmt::Formatter;

/// 서비스와 주고 받는 날짜 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 불리언 필드 변환기
///
/// # Description
/// 서버는 불리언 값을 JSON 불리언 혹은 숫자 문자열(`"0"`, `"1"`)로 보낸다.
/// 어느 쪽으로 오든 같은 값으로 해석하며, 직렬화 할 때는 항상 JSON 불리언으로 쓴다.
/// 숫자는 0이 아니면 참이다. 숫자 문자열은 0~255 범위만 허용한다.
pub struct BoolFromAny;

impl SerializeAs<bool> for BoolFromAny {
    fn serialize_as<S>(source: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_bool(*source)
    }
}

impl<'de> DeserializeAs<'de, bool> for BoolFromAny {
    fn deserialize_as<D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>
    {
        struct Helper;
        impl Visitor<'_> for Helper {
            type Value = bool;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a boolean or a numeric string")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v != 0)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v != 0)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_flag(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
            }
        }
        deserializer.deserialize_any(Helper)
    }
}

/// 날짜 필드 변환기
///
/// # Description
/// `YYYY-MM-DD` 형식으로 읽고 쓴다. 서버가 시각을 붙여 보내는 경우(`2024-01-15 00:00:00`)
/// 시각은 버리고 날짜만 남긴다.
pub struct CalendarDate;

impl SerializeAs<NaiveDate> for CalendarDate {
    fn serialize_as<S>(source: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(&format_date(source))
    }
}

impl<'de> DeserializeAs<'de, NaiveDate> for CalendarDate {
    fn deserialize_as<D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>
    {
        struct Helper;
        impl Visitor<'_> for Helper {
            type Value = NaiveDate;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a date formatted as YYYY-MM-DD")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_date(v).map_err(|e| E::custom(format!("invalid date {:?}: {}", v, e)))
            }
        }
        deserializer.deserialize_str(Helper)
    }
}

pub fn parse_flag(s: &str) -> Option<bool> {
    s.trim().parse::<u8>().ok().map(|n| n != 0)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let s = s.trim();
    let day = match s.split_once(|c: char| c == ' ' || c == 'T') {
        Some((day, _)) => day,
        None => s,
    };
    NaiveDate::parse_from_str(day, DATE_FORMAT)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
