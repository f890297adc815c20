//! 라우트 가드.
//!
//! 모든 요청에서 경로를 분류하고, 세션과 역할에 따라 통과 또는 리다이렉트를 결정합니다.
//!
//! 결정 순서:
//! 1. 정적 자원 접두사 → 통과
//! 2. 로그인 화면 + 세션 있음 → 기본 랜딩 (쿼리 제거)
//! 3. 세션 없음 + 공개 경로 아님 → `/login?next=<인코딩된 경로+쿼리>`
//! 4. 세션 있음 + 역할 부족 → `/unauthorized`

mod middleware;
mod table;

pub use middleware::route_guard;
pub use table::{is_local_path, matches_route, RouteClass, RouteTable};

use shopdesk_core::Session;

/// 가드 결정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 검사 없이 통과 (정적 자원)
    Bypass,
    /// 핸들러로 전달
    Allow,
    /// 리다이렉트
    Redirect(String),
}

impl GuardDecision {
    /// 메트릭/로그 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bypass => "bypass",
            Self::Allow => "allow",
            Self::Redirect(_) => "redirect",
        }
    }
}

/// 순수 라우트 가드.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// 요청 경로와 세션으로 가드 결정을 계산합니다.
    ///
    /// # Arguments
    /// * `path` - 요청 경로
    /// * `query` - 쿼리 문자열 (`?` 제외)
    /// * `session` - 해제된 세션 (없거나 무효하면 `None`)
    pub fn evaluate(&self, path: &str, query: Option<&str>, session: Option<&Session>) -> GuardDecision {
        let class = self.table.classify(path);

        match (class, session) {
            (RouteClass::Static, _) => GuardDecision::Bypass,
            (RouteClass::AuthOnly, Some(_)) => GuardDecision::Redirect(self.table.landing().to_string()),
            // 로그인 화면은 세션 없이 접근 가능해야 함
            (RouteClass::Public | RouteClass::AuthOnly, _) => GuardDecision::Allow,
            (_, None) => GuardDecision::Redirect(self.login_redirect(path, query)),
            (class @ (RouteClass::Admin | RouteClass::Vendor), Some(session))
                if !class.permitted_roles().contains(&session.role()) =>
            {
                GuardDecision::Redirect(self.table.unauthorized().to_string())
            }
            (_, Some(_)) => GuardDecision::Allow,
        }
    }

    /// 로그인 리다이렉트 경로 (`next`에 원래 경로와 쿼리를 인코딩).
    pub fn login_redirect(&self, path: &str, query: Option<&str>) -> String {
        let next = match query {
            Some(q) if !q.is_empty() => format!("{path}?{q}"),
            _ => path.to_string(),
        };
        format!("{}?next={}", self.table.login(), urlencoding::encode(&next))
    }
}
