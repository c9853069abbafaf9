use crate::provider::http::DEFAULT_TIMEOUT_SECONDS;
use crate::repo::ExitProcess;
use serde::Deserialize;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// 원격 API 접속 정보
#[derive(Deserialize)]
pub struct Config {
    base_url: String,
    username: String,
    password: String,

    /// 요청 타임아웃(초). 설정하지 않을 시 10초
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,

    /// API 를 사용할 수 없을 때 프로세스의 종료 코드
    #[serde(default = "default_exit_code")]
    exit_code: i32,
}

impl Config {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
            timeout_seconds: default_timeout_seconds(),
            exit_code: default_exit_code(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_exit_code() -> i32 {
    ExitProcess::DEFAULT_CODE
}
