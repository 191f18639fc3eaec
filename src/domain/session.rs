//! Operator session entities.

use uuid::Uuid;

use super::cookies::CookieJar;

/// Channel tag recorded on every account this binary manages.
pub const CHANNEL: &str = "pinduoduo";

/// One operator account and the session state attached to it.
///
/// Identity fields stay `None` until session setup fills them in from the
/// gateway. The cookie set is replaced wholesale, never mutated in place,
/// so clients can hold their own snapshot safely.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub channel: &'static str,
    pub username: String,
    pub password: String,
    pub user_id: Option<String>,
    pub shop_id: Option<String>,
    pub shop_name: Option<String>,
    pub mall_logo: Option<String>,
    cookies: CookieJar,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: CHANNEL,
            username: username.into(),
            password: password.into(),
            user_id: None,
            shop_id: None,
            shop_name: None,
            mall_logo: None,
            cookies: CookieJar::new(),
        }
    }

    pub fn update_cookies(&mut self, cookies: CookieJar) {
        self.cookies = cookies;
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }
}

/// Shop identity as reported by the merchant-info endpoint.
#[derive(Debug, Clone)]
pub struct Shop {
    pub shop_id: String,
    pub name: String,
    pub logo: Option<String>,
}
