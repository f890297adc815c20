//! 설정 관리.
//!
//! 이 모듈은 게이트웨이 설정을 정의하고 관리합니다.
//! 우선순위: 기본값 < `config/default.toml` (선택) < `SHOPDESK__*` 환경 변수.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 백엔드 API 설정
    pub backend: BackendConfig,
    /// 세션 쿠키 설정
    pub session: SessionConfig,
    /// 라우트 분류 설정
    pub routes: RouteConfig,
    /// 인증 실패 브로드캐스트 설정
    pub auth_failure: AuthFailureConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 프론트엔드 공개 URL (CORS 허용 origin)
    pub frontend_url: String,
    /// 요청 처리 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            frontend_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// 백엔드 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 15,
        }
    }
}

/// 세션 쿠키 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 서명/암호화 시크릿 (최소 32바이트)
    #[serde(skip_serializing)]
    pub secret: String,
    /// 세션 유효 기간 (일)
    pub ttl_days: i64,
    /// `Secure` 쿠키 속성 사용 여부
    pub secure_cookie: bool,
    /// 세션 쿠키 이름
    pub cookie_name: String,
    /// oauth 핸드오프 쿠키 이름
    pub oauth_cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_days: 30,
            secure_cookie: false,
            cookie_name: "shopdesk.session-token".to_string(),
            oauth_cookie_name: "shopdesk.oauth-token".to_string(),
        }
    }
}

impl SessionConfig {
    /// 시크릿을 `SecretString`으로 반환.
    pub fn secret(&self) -> SecretString {
        SecretString::from(self.secret.clone())
    }
}

/// 라우트 분류 설정.
///
/// 모든 값은 경로 접두사이며, 경로가 값과 같거나 `값 + "/"`로 시작하면 일치합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// 검사 없이 통과시키는 내부/정적 자원 접두사
    pub static_prefixes: Vec<String>,
    /// 비로그인 상태로 접근 가능한 경로
    pub public: Vec<String>,
    /// 로그인 상태에서는 접근하지 않는 경로 (로그인 화면)
    pub auth_only: Vec<String>,
    /// ADMIN, SUPERADMIN 전용 경로
    pub admin: Vec<String>,
    /// VENDOR 이상 전용 경로
    pub vendor: Vec<String>,
    /// 기본 랜딩 경로
    pub landing: String,
    /// 로그인 경로
    pub login: String,
    /// 권한 없음 안내 경로
    pub unauthorized: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            static_prefixes: owned(&["/_next", "/static", "/assets", "/favicon.ico"]),
            public: owned(&["/health", "/metrics", "/unauthorized", "/auth/oauth"]),
            auth_only: owned(&["/login"]),
            admin: owned(&["/users", "/coupons", "/campaigns"]),
            vendor: owned(&[
                "/products",
                "/categories",
                "/brands",
                "/tags",
                "/attributes",
                "/orders",
            ]),
            landing: "/".to_string(),
            login: "/login".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

/// 인증 실패 브로드캐스트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthFailureConfig {
    /// 같은 세션에 대한 중복 로그아웃 억제 시간 (밀리초)
    pub reset_ms: u64,
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,
}

impl Default for AuthFailureConfig {
    fn default() -> Self {
        Self {
            reset_ms: 2000,
            channel_capacity: 64,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드 (없으면 건너뜀)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SHOPDESK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("routes.static_prefixes")
                    .with_list_parse_key("routes.public")
                    .with_list_parse_key("routes.auth_only")
                    .with_list_parse_key("routes.admin")
                    .with_list_parse_key("routes.vendor")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_legacy_env();
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `.env` 파일이 있으면 먼저 읽어 환경 변수로 반영합니다.
    pub fn load_default() -> CoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::load("config/default.toml")
    }

    /// 접두사 없는 기존 환경 변수(`BACKEND_URL`, `SESSION_SECRET`, `FRONTEND_URL`)를 반영합니다.
    ///
    /// `SHOPDESK__*` 값이 기본값과 다르게 설정되어 있으면 그 값이 우선합니다.
    fn apply_legacy_env(&mut self) {
        if self.backend.base_url == BackendConfig::default().base_url {
            if let Ok(url) = std::env::var("BACKEND_URL") {
                self.backend.base_url = url;
            }
        }
        if self.session.secret.is_empty() {
            if let Ok(secret) = std::env::var("SESSION_SECRET") {
                self.session.secret = secret;
            }
        }
        if self.server.frontend_url == ServerConfig::default().frontend_url {
            if let Ok(url) = std::env::var("FRONTEND_URL") {
                self.server.frontend_url = url;
            }
        }
    }

    /// 설정 값을 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(CoreError::Config("backend.base_url is empty".to_string()));
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(CoreError::Config(format!(
                "backend.base_url must be an http(s) URL: {}",
                self.backend.base_url
            )));
        }
        if self.session.secret.len() < crate::crypto::MIN_SECRET_LEN {
            return Err(CoreError::Config(format!(
                "session.secret must be at least {} bytes",
                crate::crypto::MIN_SECRET_LEN
            )));
        }
        if self.session.ttl_days <= 0 {
            return Err(CoreError::Config("session.ttl_days must be positive".to_string()));
        }
        for path in [&self.routes.landing, &self.routes.login, &self.routes.unauthorized] {
            if !path.starts_with('/') {
                return Err(CoreError::Config(format!("route must start with '/': {}", path)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.session.secret = "0123456789abcdef0123456789abcdef".to_string();
        config
    }

    #[test]
    fn test_default_route_tables() {
        let routes = RouteConfig::default();
        assert!(routes.auth_only.contains(&"/login".to_string()));
        assert!(routes.admin.contains(&"/users".to_string()));
        assert!(routes.vendor.contains(&"/products".to_string()));
        assert_eq!(routes.landing, "/");
    }

    #[test]
    fn test_validate_accepts_defaults_with_secret() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_backend() {
        let mut config = valid_config();
        config.backend.base_url = "ftp://backend".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_not_serialized() {
        let json = serde_json::to_string(&valid_config()).unwrap();
        assert!(!json.contains("0123456789abcdef"));
    }
}
