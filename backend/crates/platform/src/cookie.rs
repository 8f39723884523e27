//! Cookie Management Infrastructure
//!
//! Cookie parsing, `Set-Cookie` building and a request-scoped cookie jar
//! that keeps the incoming view consistent with cookies issued during the
//! same request.

use std::collections::HashMap;

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Error when building cookie headers
#[derive(Debug, Clone, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("Invalid Set-Cookie header value for cookie {0:?}")]
    InvalidHeader(String),
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
    pub expires: Option<DateTime<Utc>>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
            expires: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if let Some(expires) = self.expires {
            cookie.push_str(&format!("; Expires={}", http_date(expires)));
        }
        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        cookie.push_str(&format!("; Path={}", self.path));
        if self.secure {
            cookie.push_str("; Secure");
        }
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));

        cookie
    }
}

/// Format a timestamp as an IMF-fixdate (`Wed, 21 Oct 2015 07:28:00 GMT`)
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Check a cookie name against the RFC 6265 token grammar
pub fn is_valid_cookie_name(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> Result<HeaderValue, CookieError> {
    if !is_valid_cookie_name(&config.name) {
        return Err(CookieError::InvalidName(config.name.clone()));
    }

    HeaderValue::from_str(&config.build_set_cookie(value))
        .map_err(|_| CookieError::InvalidHeader(config.name.clone()))
}

/// Request-scoped cookie jar
///
/// Holds the cookies the client sent plus every `Set-Cookie` issued while
/// handling the request. Issuing a cookie also updates the incoming view.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: HashMap<String, String>,
    outgoing: Vec<HeaderValue>,
}

impl CookieJar {
    /// Parse every `Cookie` header of a request. The first occurrence of a name wins.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();

        for pair in headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
        {
            if let Some((key, value)) = pair.trim().split_once('=') {
                incoming
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.incoming.get(name).map(String::as_str)
    }

    /// Issue a cookie for the response and mirror it into the request view
    pub fn add(&mut self, config: &CookieConfig, value: &str) -> Result<(), CookieError> {
        let header = set_cookie_header(config, value)?;
        self.outgoing.push(header);
        self.incoming.insert(config.name.clone(), value.to_string());
        Ok(())
    }

    /// `Set-Cookie` values issued so far
    pub fn pending(&self) -> &[HeaderValue] {
        &self.outgoing
    }

    /// Append every issued cookie to a response header map
    pub fn write_to(&self, headers: &mut HeaderMap) {
        for value in &self.outgoing {
            headers.append(header::SET_COOKIE, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "test".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: Some(3600),
            expires: Some(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap()),
        };

        let cookie = config.build_set_cookie("1");
        assert!(cookie.starts_with("test=1"));
        assert!(cookie.contains("Expires=Wed, 21 Oct 2015 07:28:00 GMT"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_insecure_cookie_omits_secure() {
        let config = CookieConfig {
            secure: false,
            ..Default::default()
        };
        assert!(!config.build_set_cookie("v").contains("Secure"));
    }

    #[test]
    fn test_cookie_name_grammar() {
        assert!(is_valid_cookie_name("age_verified"));
        assert!(!is_valid_cookie_name(""));
        assert!(!is_valid_cookie_name("age verified"));
        assert!(!is_valid_cookie_name("age;verified"));
        assert!(!is_valid_cookie_name("äge"));
    }

    #[test]
    fn test_jar_add_updates_request_view() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("a=1; b=2"));
        let mut jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get("a"), Some("1"));
        assert_eq!(jar.get("c"), None);

        let config = CookieConfig {
            name: "c".to_string(),
            ..Default::default()
        };
        jar.add(&config, "3").unwrap();

        assert_eq!(jar.get("c"), Some("3"));
        assert_eq!(jar.pending().len(), 1);

        let mut response_headers = HeaderMap::new();
        jar.write_to(&mut response_headers);
        assert_eq!(response_headers.get_all(header::SET_COOKIE).iter().count(), 1);
    }

    #[test]
    fn test_jar_rejects_invalid_name() {
        let mut jar = CookieJar::default();
        let config = CookieConfig {
            name: "bad name".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            jar.add(&config, "1"),
            Err(CookieError::InvalidName(_))
        ));
        assert!(jar.pending().is_empty());
        assert_eq!(jar.get("bad name"), None);
    }
}
