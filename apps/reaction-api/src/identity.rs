//! Per-browser user identifier carried in a cookie
//!
//! The identifier is an opaque partition key chosen by whoever holds the
//! cookie. It is never treated as a credential.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "user_id";

const MAX_ID_LEN: usize = 128;

/// Fresh random identifier for a first-time visitor
pub fn new_user_id() -> String {
    Uuid::new_v4().to_string()
}

/// Read the user identifier from the request's `Cookie` headers.
///
/// Values that could not have come from `session_cookie` (empty, oversized,
/// or containing characters outside `[A-Za-z0-9_-]`) are ignored.
pub fn user_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| is_valid_id(value))
        .map(str::to_string)
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `Set-Cookie` value issuing (or refreshing) the identifier
pub fn session_cookie(user_id: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
        COOKIE_NAME, user_id, max_age_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[test]
    fn test_no_cookie() {
        assert_eq!(user_id_from_headers(&HeaderMap::new()), None);
        assert_eq!(user_id_from_headers(&headers(&["theme=dark"])), None);
    }

    #[test]
    fn test_finds_cookie_among_others() {
        let map = headers(&["theme=dark; user_id=abc-123; lang=en"]);
        assert_eq!(user_id_from_headers(&map), Some("abc-123".to_string()));
    }

    #[test]
    fn test_finds_cookie_in_second_header() {
        let map = headers(&["theme=dark", "user_id=\"xyz\""]);
        assert_eq!(user_id_from_headers(&map), Some("xyz".to_string()));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert_eq!(user_id_from_headers(&headers(&["user_id="])), None);
        assert_eq!(user_id_from_headers(&headers(&["user_id=a b"])), None);
        let long = format!("user_id={}", "a".repeat(MAX_ID_LEN + 1));
        assert_eq!(user_id_from_headers(&headers(&[long.as_str()])), None);
    }

    #[test]
    fn test_generated_ids_round_trip_through_cookie() {
        let id = new_user_id();
        assert_eq!(id.len(), 36);

        let cookie = session_cookie(&id, 60);
        assert!(cookie.starts_with(&format!("user_id={};", id)));
        assert!(cookie.contains("Max-Age=60"));

        let request_cookie = cookie.split(';').next().unwrap().to_string();
        assert_eq!(user_id_from_headers(&headers(&[request_cookie.as_str()])), Some(id));
    }

    proptest! {
        #[test]
        fn arbitrary_cookie_headers_never_panic(raw in "[ -~]{0,200}") {
            if let Ok(value) = HeaderValue::from_str(&raw) {
                let mut map = HeaderMap::new();
                map.insert(header::COOKIE, value);
                if let Some(id) = user_id_from_headers(&map) {
                    prop_assert!(is_valid_id(&id));
                }
            }
        }

        #[test]
        fn valid_ids_are_read_back(id in "[A-Za-z0-9_-]{1,128}") {
            let map = headers(&[format!("theme=dark; user_id={}", id).as_str()]);
            prop_assert_eq!(user_id_from_headers(&map), Some(id));
        }
    }
}
