//! 라우트 분류 테이블.

use shopdesk_core::{Role, RouteConfig};

/// 경로가 라우트와 일치하는지 확인.
///
/// 경로가 라우트와 같거나 `라우트 + "/"`로 시작할 때만 일치합니다.
/// `/productsx`는 `/products`와 일치하지 않습니다.
pub fn matches_route(path: &str, route: &str) -> bool {
    if path == route {
        return true;
    }
    let route = route.trim_end_matches('/');
    path.len() > route.len() && path.starts_with(route) && path.as_bytes()[route.len()] == b'/'
}

fn matches_any(path: &str, routes: &[String]) -> bool {
    routes.iter().any(|route| matches_route(path, route))
}

/// 경로 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// 내부/정적 자원
    Static,
    /// 비로그인 접근 허용
    Public,
    /// 로그인 화면 (로그인 상태에서는 랜딩으로 이동)
    AuthOnly,
    /// ADMIN, SUPERADMIN 전용
    Admin,
    /// VENDOR 이상 전용
    Vendor,
    /// 로그인만 필요
    Protected,
}

impl RouteClass {
    /// 이 분류에 접근할 수 있는 역할 목록.
    pub fn permitted_roles(&self) -> &'static [Role] {
        const ADMINS: &[Role] = &[Role::Admin, Role::Superadmin];
        const VENDORS: &[Role] = &[Role::Vendor, Role::Admin, Role::Superadmin];
        const ALL: &[Role] = &[Role::Customer, Role::Vendor, Role::Admin, Role::Superadmin];

        match self {
            RouteClass::Admin => ADMINS,
            RouteClass::Vendor => VENDORS,
            _ => ALL,
        }
    }

    /// 메트릭 라벨.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Static => "static",
            RouteClass::Public => "public",
            RouteClass::AuthOnly => "auth_only",
            RouteClass::Admin => "admin",
            RouteClass::Vendor => "vendor",
            RouteClass::Protected => "protected",
        }
    }
}

/// 시작 시 한 번 로드되는 라우트 분류 테이블.
#[derive(Debug, Clone)]
pub struct RouteTable {
    config: RouteConfig,
}

impl RouteTable {
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    /// 경로 분류.
    ///
    /// 정적 → 공개 → 로그인 화면 → 관리자 → 판매자 순으로 검사합니다.
    pub fn classify(&self, path: &str) -> RouteClass {
        let c = &self.config;
        if matches_any(path, &c.static_prefixes) {
            RouteClass::Static
        } else if matches_any(path, &c.public) {
            RouteClass::Public
        } else if matches_any(path, &c.auth_only) {
            RouteClass::AuthOnly
        } else if matches_any(path, &c.admin) {
            RouteClass::Admin
        } else if matches_any(path, &c.vendor) {
            RouteClass::Vendor
        } else {
            RouteClass::Protected
        }
    }

    pub fn landing(&self) -> &str {
        &self.config.landing
    }

    pub fn login(&self) -> &str {
        &self.config.login
    }

    pub fn unauthorized(&self) -> &str {
        &self.config.unauthorized
    }

    /// 로그인 후 이동할 경로.
    ///
    /// `next`가 로컬 경로(`/`로 시작하고 `//`가 아님)일 때만 사용하고,
    /// 아니면 기본 랜딩 경로를 반환합니다.
    pub fn post_login_target(&self, next: Option<&str>) -> String {
        match next {
            Some(next) if is_local_path(next) => next.to_string(),
            _ => self.config.landing.clone(),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(RouteConfig::default())
    }
}

/// 오픈 리다이렉트를 막기 위한 로컬 경로 검사.
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}
