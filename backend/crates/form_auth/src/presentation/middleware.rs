//! Gate Middleware
//!
//! Runs every request through the [`AuthenticationGate`] and turns its
//! decision into an axum response.

use std::borrow::Cow;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_client_ip;
use platform::cookie::{CookieConfig, extract_cookie, to_header_value};

use crate::application::authenticate::{
    AuthenticationGate, CookieInstruction, GateAction, GateDecision,
};
use crate::domain::repository::CredentialVerifier;
use crate::domain::request::GateRequest;
use crate::presentation::dto::LoginForm;

/// Middleware state
pub struct FormAuthState<V>
where
    V: CredentialVerifier,
{
    pub gate: Arc<AuthenticationGate<V>>,
    pub cookies: Arc<CookieConfig>,
}

impl<V> FormAuthState<V>
where
    V: CredentialVerifier + Sync,
{
    pub fn new(gate: AuthenticationGate<V>) -> Self {
        let config = gate.config();
        let cookies = CookieConfig {
            secure: config.cookie_secure,
            http_only: true,
            same_site: config.cookie_same_site,
            path: config.cookie_path().to_string(),
            max_age_secs: None,
        };

        Self {
            gate: Arc::new(gate),
            cookies: Arc::new(cookies),
        }
    }
}

impl<V> Clone for FormAuthState<V>
where
    V: CredentialVerifier,
{
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

/// Request view handed to the gate
struct HttpGateRequest<'a> {
    parts: &'a Parts,
    path: Cow<'a, str>,
    context_path: &'a str,
    form: Option<&'a LoginForm>,
    remote_addr: Option<IpAddr>,
}

impl<'a> HttpGateRequest<'a> {
    fn new(parts: &'a Parts, context_path: &'a str, form: Option<&'a LoginForm>) -> Self {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Self {
            parts,
            path: decode_path(parts.uri.path()),
            context_path,
            form,
            remote_addr: extract_client_ip(&parts.headers, direct_ip),
        }
    }
}

impl GateRequest for HttpGateRequest<'_> {
    fn method(&self) -> &Method {
        &self.parts.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn raw_path(&self) -> &str {
        self.parts.uri.path()
    }

    fn context_path(&self) -> &str {
        self.context_path
    }

    fn query(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    fn cookie(&self, name: &str) -> Option<String> {
        extract_cookie(&self.parts.headers, name)
    }

    fn form_param(&self, name: &str) -> Option<String> {
        self.form?.field(name).map(str::to_string)
    }

    fn remote_addr(&self) -> Option<IpAddr> {
        self.remote_addr
    }
}

/// Percent-decode a request path; undecodable paths are matched raw
fn decode_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Buffer a login form body, returning the bytes to re-attach
async fn read_login_form(body: Body, limit: usize) -> (Option<LoginForm>, Body) {
    match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => (LoginForm::from_bytes(&bytes), Body::from(bytes)),
        Err(e) => {
            tracing::warn!(error = %e, limit, "Login form body unreadable or too large");
            (None, Body::empty())
        }
    }
}

/// Login fields of a non-POST submission come from the query string
fn query_login_form(parts: &Parts) -> Option<LoginForm> {
    LoginForm::from_bytes(parts.uri.query().unwrap_or_default().as_bytes())
}

/// Middleware that puts the gate in front of every route
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn form_auth_gate<V>(
    State(state): State<FormAuthState<V>>,
    request: Request,
    next: Next,
) -> Response
where
    V: CredentialVerifier + Sync + 'static,
{
    let gate = &state.gate;
    let context_path = gate.config().context_path.as_str();
    let settings = gate.settings().snapshot();
    let (parts, mut body) = request.into_parts();

    // Bodies are buffered only when the login branch will run; a proven
    // identity forwards the request untouched.
    let is_login = gate.is_login_submission(
        &parts.method,
        &decode_path(parts.uri.path()),
        context_path,
    ) && gate
        .identify(&HttpGateRequest::new(&parts, context_path, None), &settings)
        .is_none();

    let form = if !is_login {
        None
    } else if parts.method == Method::POST {
        let (form, buffered) = read_login_form(body, gate.config().max_form_bytes).await;
        body = buffered;
        form
    } else {
        query_login_form(&parts)
    };

    let decision = {
        let view = HttpGateRequest::new(&parts, context_path, form.as_ref());
        gate.process_with(&view, &settings).await
    };
    drop(form);

    let GateDecision {
        state: gate_state,
        action,
        cookies,
    } = decision;
    tracing::trace!(state = ?gate_state, "Gate decision");

    let mut response = match action {
        GateAction::Forward { user } => {
            let mut request = Request::from_parts(parts, body);
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        GateAction::Redirect { location } => see_other(&location),
        GateAction::Render(page) => {
            let mut response = (page.status, page.body).into_response();
            for (name, value) in page.headers {
                response.headers_mut().insert(name, value);
            }
            response
        }
    };

    apply_cookies(response.headers_mut(), &state.cookies, &cookies);
    response
}

fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (
            StatusCode::SEE_OTHER,
            [
                (header::LOCATION, location),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response(),
        Err(_) => {
            tracing::error!(%location, "Redirect target is not a valid header value");
            (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, HeaderValue::from_static("/"))],
            )
                .into_response()
        }
    }
}

/// Append one `Set-Cookie` header per instruction
fn apply_cookies(headers: &mut HeaderMap, config: &CookieConfig, cookies: &[CookieInstruction]) {
    for instruction in cookies {
        let (name, cookie) = match instruction {
            CookieInstruction::Set { name, value } => (name, config.build_set_cookie(name, value)),
            CookieInstruction::Clear { name } => (name, config.build_delete_cookie(name)),
        };

        match to_header_value(&cookie) {
            Some(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            None => tracing::error!(cookie = %name, "Cookie value is not a valid header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/a%20b/c.css"), "/a b/c.css");
        assert_eq!(decode_path("/plain"), "/plain");
        // invalid UTF-8 after decoding
        assert_eq!(decode_path("/bad%FF"), "/bad%FF");
    }

    #[test]
    fn test_apply_cookies() {
        let config = CookieConfig {
            secure: false,
            path: "/myapp".to_string(),
            ..Default::default()
        };
        let mut headers = HeaderMap::new();
        apply_cookies(
            &mut headers,
            &config,
            &[
                CookieInstruction::Set {
                    name: "__fa_user".to_string(),
                    value: "alice".to_string(),
                },
                CookieInstruction::Clear {
                    name: "__fa_proof".to_string(),
                },
            ],
        );

        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("__fa_user=alice; HttpOnly"));
        assert!(values[0].contains("Path=/myapp"));
        assert!(values[1].starts_with("__fa_proof=;"));
        assert!(values[1].contains("Max-Age=0"));
    }

    #[test]
    fn test_see_other() {
        let response = see_other("/home?x=1");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/home?x=1");
    }
}
