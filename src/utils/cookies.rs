use axum::http::{header, HeaderMap, HeaderValue};

/// Returns the value of the named cookie from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next()?;
            (key == name).then(|| value.trim_matches('"').to_string())
        })
        .find(|value| !value.is_empty())
}

/// Session token from the session cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = read_cookie(headers, cookie_name) {
        return Some(token);
    }
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub fn session_cookie(name: &str, token: &str, max_age: Option<i64>) -> HeaderValue {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, token);
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| expired_cookie(name))
}

pub fn expired_cookie(name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        name
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("session=; Path=/; Max-Age=0"))
}
