use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{AuthenticatedUser, UserRole};

/// Caller identity shared by every request an [`ApiClient`] makes.
///
/// Cookies set by the server are captured here and replayed on later calls,
/// together with the signed-in user. Clones share the same state, so a
/// session can be handed to several clients.
///
/// [`ApiClient`]: crate::client::ApiClient
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    cookies: BTreeMap<String, String>,
    role: Option<UserRole>,
    user: Option<AuthenticatedUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Value for the `Cookie` request header, if any cookie is held.
    pub fn cookie_header(&self) -> Option<String> {
        let state = self.read();
        if state.cookies.is_empty() {
            return None;
        }

        Some(
            state
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Applies `Set-Cookie` headers from a response. An empty value, a
    /// non-positive `Max-Age` or an `Expires` date in the past deletes the
    /// cookie.
    pub fn store_cookies(&self, set_cookies: &[String]) {
        if set_cookies.is_empty() {
            return;
        }

        let now = Utc::now();
        let mut state = self.write();
        for header in set_cookies {
            let mut parts = header.split(';');
            let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let expired = parts.any(|attr| attribute_expires(attr, now));

            let value = value.trim().trim_matches('"');
            if expired || value.is_empty() {
                state.cookies.remove(name);
            } else {
                state.cookies.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn sign_in(&self, role: UserRole, user: AuthenticatedUser) {
        let mut state = self.write();
        state.role = Some(role);
        state.user = Some(user);
    }

    /// Forgets the user and every stored cookie.
    pub fn clear(&self) {
        let mut state = self.write();
        state.cookies.clear();
        state.role = None;
        state.user = None;
    }

    pub fn role(&self) -> Option<UserRole> {
        self.read().role
    }

    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().role.is_some()
    }
}

fn attribute_expires(attr: &str, now: DateTime<Utc>) -> bool {
    let Some((key, value)) = attr.split_once('=') else {
        return false;
    };
    let (key, value) = (key.trim(), value.trim());

    if key.eq_ignore_ascii_case("max-age") {
        return value.parse::<i64>().is_ok_and(|seconds| seconds <= 0);
    }
    if key.eq_ignore_ascii_case("expires") {
        // Netscape-style dates separate day, month and year with dashes.
        return DateTime::parse_from_rfc2822(&value.replace('-', " "))
            .is_ok_and(|expires| expires.with_timezone(&Utc) <= now);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_roundtrip() {
        let session = Session::new();
        assert_eq!(session.cookie_header(), None);

        session.store_cookies(&[
            "connect.sid=s%3Aabc.def; Path=/; HttpOnly; Secure".to_string(),
            "theme=dark".to_string(),
        ]);

        assert_eq!(
            session.cookie_header().as_deref(),
            Some("connect.sid=s%3Aabc.def; theme=dark")
        );
    }

    #[test]
    fn test_cookie_expiry_removes_entry() {
        let session = Session::new();
        session.store_cookies(&["connect.sid=abc; Path=/".to_string()]);
        session.store_cookies(&["connect.sid=; Path=/; Max-Age=0".to_string()]);
        assert_eq!(session.cookie_header(), None);
    }

    #[test]
    fn test_past_expires_removes_entry() {
        let session = Session::new();
        session.store_cookies(&["connect.sid=abc; Path=/".to_string()]);
        session.store_cookies(&[
            "connect.sid=abc; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
        ]);
        assert_eq!(session.cookie_header(), None);

        session.store_cookies(&["theme=dark; Expires=Thu, 01-Jan-1970 00:00:00 GMT".to_string()]);
        session.store_cookies(&["lang=en; Max-Age=-1".to_string()]);
        assert_eq!(session.cookie_header(), None);
    }

    #[test]
    fn test_future_expires_keeps_entry() {
        let session = Session::new();
        session.store_cookies(&[
            "connect.sid=abc; Expires=Fri, 31 Dec 9999 23:59:59 GMT; HttpOnly".to_string(),
            "theme=dark; Expires=not a date".to_string(),
        ]);
        assert_eq!(session.cookie_header().as_deref(), Some("connect.sid=abc; theme=dark"));
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::new();
        let other = session.clone();

        other.sign_in(
            UserRole::Farmer,
            AuthenticatedUser {
                id: Some(1),
                email: "f@example.com".to_string(),
                first_name: None,
                last_name: None,
                user_type: Some(UserRole::Farmer),
                farm_name: None,
                farm_size: None,
                location: None,
            },
        );

        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(UserRole::Farmer));

        session.clear();
        assert!(!other.is_authenticated());
        assert!(other.user().is_none());
    }
}
