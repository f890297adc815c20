//! 세션 쿠키 읽기/쓰기.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::warn;

/// 요청 헤더에서 쿠키 값 읽기.
///
/// 여러 `Cookie` 헤더와 `; `로 구분된 쌍을 모두 검사합니다.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` 헤더 빌더.
#[derive(Debug, Clone)]
pub struct CookieBuilder<'a> {
    pub name: &'a str,
    pub secure: bool,
}

impl<'a> CookieBuilder<'a> {
    pub fn new(name: &'a str, secure: bool) -> Self {
        Self { name, secure }
    }

    /// 값과 수명을 가진 쿠키.
    pub fn issue(&self, value: &str, max_age_secs: i64) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
            self.name,
            value,
            max_age_secs.max(0),
            self.secure_attr()
        )
    }

    /// 즉시 만료되는 쿠키.
    pub fn expire(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT{}",
            self.name,
            self.secure_attr()
        )
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure {
            "; Secure"
        } else {
            ""
        }
    }
}

/// 응답에 `Set-Cookie` 헤더 추가.
pub fn append_set_cookie(response: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Dropping invalid Set-Cookie header"),
    }
}
