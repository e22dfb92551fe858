use cookie::{
    time::{Duration, OffsetDateTime},
    Cookie,
};
use http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

/// Thirty days, the default lifetime of cookies and backend entries.
pub const DEFAULT_MAX_AGE: i64 = 86400 * 30;

/// Attributes applied to every cookie issued for a session.
///
/// `max_age` is in seconds: zero issues a browser-session cookie, a negative value marks
/// the session for deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub domain: Option<String>,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            max_age: DEFAULT_MAX_AGE,
            secure: false,
            http_only: true,
        }
    }
}

impl CookieOptions {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
}

/// Builds a cookie carrying `value` with the given attributes.
pub(crate) fn new_cookie(name: &str, value: &str, options: &CookieOptions) -> Cookie<'static> {
    let mut builder = Cookie::build((name.to_string(), value.to_string()))
        .path(options.path.clone())
        .secure(options.secure)
        .http_only(options.http_only);
    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }
    if options.max_age > 0 {
        let max_age = Duration::seconds(options.max_age);
        builder = builder
            .max_age(max_age)
            .expires(OffsetDateTime::now_utc() + max_age);
    } else if options.max_age < 0 {
        builder = builder
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH);
    }
    builder.build()
}

/// Returns the value of the first cookie called `name` in the request headers.
pub(crate) fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| Cookie::split_parse(header.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

pub(crate) fn set_cookie(
    headers: &mut HeaderMap,
    cookie: &Cookie<'_>,
) -> Result<(), InvalidHeaderValue> {
    let value = HeaderValue::from_str(&cookie.to_string())?;
    headers.append(SET_COOKIE, value);
    Ok(())
}
