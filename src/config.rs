pub mod api;
pub mod log;

use serde::Deserialize;
use std::env;
use std::path::Path;

pub use ::config::ConfigError;

/// 설정 파일이 있는 디렉토리
const CONFIG_DIR: &str = "config";

/// 설정값을 덮어쓸 환경 변수의 접두어. `MEDIATEK__API__BASE_URL` 처럼 사용한다.
const ENV_PREFIX: &str = "MEDIATEK";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: api::Config,
    logger: Option<log::Config>,
}

impl AppConfig {
    pub fn api(&self) -> &api::Config {
        &self.api
    }

    pub fn logger(&self) -> Option<&log::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경 이름. 설정하지 않으면 `development` 이다.
pub fn run_mode() -> String {
    env::var("RUN_MODE").unwrap_or_else(|_| "development".into())
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// .env 파일을 로드한 뒤 설정을 읽는다.
pub fn load() -> Result<AppConfig, ConfigError> {
    load_dotenv();
    load_config()
}

/// 지정한 .env 파일을 로드한 뒤 `path` 의 설정을 읽는다.
pub fn load_from(env_file: impl AsRef<Path>, path: &str) -> Result<AppConfig, ConfigError> {
    dotenvy::from_path(env_file).ok();
    load_config_from(path)
}

/// `config/{RUN_MODE}.json` 을 읽고 환경 변수로 덮어쓴다.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&format!("{}/{}", CONFIG_DIR, run_mode()))
}

pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    let config = ::config::Config::builder()
        .add_source(::config::File::with_name(path).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
        )
        .build()?;

    config.try_deserialize()
}
