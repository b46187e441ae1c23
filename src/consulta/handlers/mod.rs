pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod logout;
pub use self::logout::logout;

pub mod search;
pub use self::search::search;

// common cookie plumbing for the handlers
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

/// Build the session cookie set on login.
pub(crate) fn session_cookie(
    cookie_name: &str,
    session_id: &str,
    max_age_seconds: u64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{cookie_name}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
}

/// Expire the session cookie. Used on logout regardless of whether the
/// session record still existed.
pub(crate) fn clear_session_cookie(cookie_name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

/// Pull the session id out of the `Cookie` header, if present.
pub(crate) fn extract_session_id(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;

    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == cookie_name && !val.is_empty() {
            return Some(val.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("other=1; consulta_cookie=01ARZ3NDEKTSV4; theme=dark"),
        );

        assert_eq!(
            extract_session_id(&headers, "consulta_cookie").as_deref(),
            Some("01ARZ3NDEKTSV4")
        );
        assert_eq!(extract_session_id(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("consulta_cookie="));

        assert_eq!(extract_session_id(&headers, "consulta_cookie"), None);
    }

    #[test]
    fn no_cookie_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_id(&headers, "consulta_cookie"), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("c", "id123", 3600).unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("c=id123;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=3600"));

        let cleared = clear_session_cookie("c").unwrap();
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
    }
}
