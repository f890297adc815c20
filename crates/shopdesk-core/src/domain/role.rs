//! 사용자 역할.
//!
//! 백엔드가 발급하는 역할 값과 라우트 접근 수준 판정.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 대문자 문자열(`"ADMIN"` 등)로 직렬화하고, 역직렬화는 대소문자를 구분하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Role {
    /// 일반 고객
    Customer,
    /// 입점 판매자
    Vendor,
    /// 관리자
    Admin,
    /// 최고 관리자
    Superadmin,
}

impl Role {
    /// 관리자 전용 화면 접근 가능 여부 (ADMIN, SUPERADMIN).
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    /// 판매자 이상 화면 접근 가능 여부 (VENDOR, ADMIN, SUPERADMIN).
    pub fn is_vendor_or_above(&self) -> bool {
        matches!(self, Role::Vendor | Role::Admin | Role::Superadmin)
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CUSTOMER" => Some(Role::Customer),
            "VENDOR" => Some(Role::Vendor),
            "ADMIN" => Some(Role::Admin),
            "SUPERADMIN" => Some(Role::Superadmin),
            _ => None,
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or_else(|| format!("unknown role: {value}"))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Customer => "CUSTOMER",
            Role::Vendor => "VENDOR",
            Role::Admin => "ADMIN",
            Role::Superadmin => "SUPERADMIN",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_access_levels() {
        assert!(Role::Superadmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Vendor.is_admin());
        assert!(!Role::Customer.is_admin());

        assert!(Role::Vendor.is_vendor_or_above());
        assert!(Role::Admin.is_vendor_or_above());
        assert!(!Role::Customer.is_vendor_or_above());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("SuperAdmin"), Some(Role::Superadmin));
        assert_eq!(Role::parse(" vendor "), Some(Role::Vendor));
        assert_eq!(Role::parse("guest"), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Superadmin).unwrap();
        assert_eq!(json, "\"SUPERADMIN\"");

        let parsed: Role = serde_json::from_str("\"VENDOR\"").unwrap();
        assert_eq!(parsed, Role::Vendor);
    }

    #[test]
    fn test_role_deserialization_ignores_case() {
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(admin, Role::Admin);

        let superadmin: Role = serde_json::from_str("\"SuperAdmin\"").unwrap();
        assert_eq!(superadmin, Role::Superadmin);

        assert!(serde_json::from_str::<Role>("\"guest\"").is_err());
    }
}
