//! 세션 쿠키, 세션 추출기, 폐기 목록.

mod cookies;
mod extract;
mod revocation;

pub use cookies::{append_set_cookie, read_cookie, CookieBuilder};
pub use extract::CurrentSession;
pub use revocation::RevocationList;
