//! Authentication Gate Use Case
//!
//! Decides, for every inbound request, whether it passes through, is a
//! login submission to verify, or must be answered with the login page.
//!
//! ## Evaluation order
//! 1. A valid cookie pair forwards the request as that user. A pair that
//!    fails to verify is queued for clearing and evaluation continues.
//! 2. A submission to the login action is verified against the identity
//!    backend: success sets the cookie pair and redirects, anything else
//!    renders the error page.
//! 3. A path the URL patterns exempt passes through anonymously.
//! 4. Everything else is answered with the login page.
//!
//! The gate returns a [`GateDecision`]; it never touches a response itself,
//! so the cookie instructions of one decision are applied together.

use std::sync::Arc;

use http::{HeaderName, HeaderValue, Method, StatusCode, header};

use crate::application::config::{GateConfig, PASSWORD_FIELD, REDIRECT_FIELD, USERNAME_FIELD};
use crate::application::settings::{GateSettings, GateSettingsHandle};
use crate::domain::entity::{AuthenticatedUser, LoginAttempt};
use crate::domain::page::{LoginPage, PageRenderer};
use crate::domain::repository::CredentialVerifier;
use crate::domain::request::GateRequest;
use crate::domain::services;
use crate::error::GateResult;

const TEXT_HTML: &str = "text/html; charset=utf-8";
const X_ROBOTS_TAG: &str = "x-robots-tag";
const X_ERROR: &str = "x-error";

/// Which branch of the gate handled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Cookie pair verified
    AuthenticatedPassthrough,
    /// Credentials accepted, cookies set
    LoginSuccessRedirect,
    /// Credentials rejected or backend failure
    LoginFailureChallenge,
    /// Path exempt from authentication
    SkippedPassthrough,
    /// Login page served in place of the resource
    Challenge,
}

/// Cookie change to apply to the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieInstruction {
    Set { name: String, value: String },
    Clear { name: String },
}

/// A page the gate answers with instead of the protected resource
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub body: String,
}

impl RenderedPage {
    fn html(status: StatusCode, body: String) -> Self {
        Self {
            status,
            headers: vec![
                (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML)),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
            body,
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
        self
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone)]
pub enum GateAction {
    /// Continue to the downstream handler
    Forward { user: Option<AuthenticatedUser> },
    /// 303 See Other to `location`
    Redirect { location: String },
    Render(RenderedPage),
}

/// Outcome of evaluating one request
#[derive(Debug, Clone)]
pub struct GateDecision {
    pub state: GateState,
    pub action: GateAction,
    pub cookies: Vec<CookieInstruction>,
}

impl GateDecision {
    /// The user proven by cookies, if the request is forwarded as one
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match &self.action {
            GateAction::Forward { user } => user.as_ref(),
            _ => None,
        }
    }
}

/// The authentication gate
pub struct AuthenticationGate<V>
where
    V: CredentialVerifier,
{
    config: Arc<GateConfig>,
    settings: Arc<GateSettingsHandle>,
    verifier: Arc<V>,
    pages: Arc<dyn PageRenderer>,
}

impl<V> AuthenticationGate<V>
where
    V: CredentialVerifier + Sync,
{
    /// Compile the configured patterns and resolve the secret
    pub fn new(config: GateConfig, verifier: V, pages: Arc<dyn PageRenderer>) -> GateResult<Self> {
        let settings = GateSettings::from_config(&config).inspect_err(|e| e.log())?;

        tracing::info!(
            context_path = %config.context_path,
            login_action = %config.login_action,
            include = config.include_pattern.as_deref(),
            exclude = config.exclude_pattern.as_deref(),
            require_post = config.require_post,
            "Authentication gate configured"
        );

        Ok(Self {
            config: Arc::new(config),
            settings: Arc::new(GateSettingsHandle::new(settings)),
            verifier: Arc::new(verifier),
            pages,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Runtime-reconfigurable patterns and secret
    pub fn settings(&self) -> &Arc<GateSettingsHandle> {
        &self.settings
    }

    /// Whether the request targets the login action
    ///
    /// Only the method and path are inspected, so adapters can call this
    /// before reading a request body.
    pub fn is_login_submission(&self, method: &Method, path: &str, context_path: &str) -> bool {
        if self.config.require_post && *method != Method::POST {
            return false;
        }
        services::context_relative_path(path, context_path)
            .is_some_and(|relative| relative == self.config.login_action)
    }

    /// User proven by the request's identity cookies
    ///
    /// Adapters call this with the snapshot they later hand to
    /// [`process_with`](Self::process_with), so both see the same secret.
    pub fn identify<R>(&self, request: &R, settings: &GateSettings) -> Option<AuthenticatedUser>
    where
        R: GateRequest + ?Sized,
    {
        let username = services::verify(
            request.cookie(&self.config.username_cookie_name).as_deref(),
            request.cookie(&self.config.proof_cookie_name).as_deref(),
            &settings.secret,
        )?;
        Some(AuthenticatedUser { username })
    }

    /// Evaluate one request against the current settings
    pub async fn process<R>(&self, request: &R) -> GateDecision
    where
        R: GateRequest + Sync + ?Sized,
    {
        let settings = self.settings.snapshot();
        self.process_with(request, &settings).await
    }

    /// Evaluate one request against an already loaded snapshot
    pub async fn process_with<R>(&self, request: &R, settings: &GateSettings) -> GateDecision
    where
        R: GateRequest + Sync + ?Sized,
    {
        let mut cookies = Vec::new();

        if let Some(user) = self.identify(request, settings) {
            tracing::debug!(username = %user.username, path = request.path(), "Identity proof accepted");
            return GateDecision {
                state: GateState::AuthenticatedPassthrough,
                action: GateAction::Forward { user: Some(user) },
                cookies,
            };
        }

        let has_gate_cookie = request.cookie(&self.config.username_cookie_name).is_some()
            || request.cookie(&self.config.proof_cookie_name).is_some();
        if has_gate_cookie {
            tracing::debug!(path = request.path(), "Identity proof rejected, clearing cookies");
            cookies.push(CookieInstruction::Clear {
                name: self.config.username_cookie_name.clone(),
            });
            cookies.push(CookieInstruction::Clear {
                name: self.config.proof_cookie_name.clone(),
            });
        }

        if self.is_login_submission(request.method(), request.path(), request.context_path()) {
            return self.login(request, settings, cookies).await;
        }

        if services::skip_authentication(
            request.path(),
            request.context_path(),
            settings.exclude.as_ref(),
            settings.include.as_ref(),
        ) {
            return GateDecision {
                state: GateState::SkippedPassthrough,
                action: GateAction::Forward { user: None },
                cookies,
            };
        }

        let target = original_url(request.raw_path(), request.query());
        tracing::debug!(path = request.path(), "Challenging unauthenticated request");

        GateDecision {
            state: GateState::Challenge,
            action: GateAction::Render(self.challenge_page(request.context_path(), target)),
            cookies,
        }
    }

    async fn login<R>(
        &self,
        request: &R,
        settings: &GateSettings,
        cookies: Vec<CookieInstruction>,
    ) -> GateDecision
    where
        R: GateRequest + Sync + ?Sized,
    {
        let client_ip = request.remote_addr();

        let Some(attempt) = LoginAttempt::from_fields(
            request.form_param(USERNAME_FIELD),
            request.form_param(PASSWORD_FIELD),
            request.form_param(REDIRECT_FIELD),
        ) else {
            tracing::warn!(?client_ip, "Login submission without user name or password");
            return self.login_failure(cookies);
        };

        match self
            .verifier
            .authenticate(&attempt.username, &attempt.password)
            .await
        {
            Ok(Some(principal)) => {
                let proof = services::mint(&principal.username, &settings.secret);
                let location = redirect_location(&attempt.redirect_target, request.context_path());

                tracing::info!(
                    username = %principal.username,
                    ?client_ip,
                    %location,
                    "Login succeeded"
                );

                GateDecision {
                    state: GateState::LoginSuccessRedirect,
                    action: GateAction::Redirect { location },
                    cookies: vec![
                        CookieInstruction::Set {
                            name: self.config.username_cookie_name.clone(),
                            value: proof.username_cookie,
                        },
                        CookieInstruction::Set {
                            name: self.config.proof_cookie_name.clone(),
                            value: proof.proof_cookie,
                        },
                    ],
                }
            }
            Ok(None) => {
                tracing::warn!(username = %attempt.username, ?client_ip, "Login failed");
                self.login_failure(cookies)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    username = %attempt.username,
                    ?client_ip,
                    "Identity backend error during login"
                );
                self.login_failure(cookies)
            }
        }
    }

    fn login_failure(&self, cookies: Vec<CookieInstruction>) -> GateDecision {
        let page = RenderedPage::html(StatusCode::UNAUTHORIZED, self.pages.error_page())
            .with_header(X_ERROR, "authentication-error");

        GateDecision {
            state: GateState::LoginFailureChallenge,
            action: GateAction::Render(page),
            cookies,
        }
    }

    fn challenge_page(&self, context_path: &str, redirect_target: String) -> RenderedPage {
        let page = LoginPage {
            form_action: format!("{}{}", context_path, self.config.login_action),
            redirect_target,
            username_field: USERNAME_FIELD,
            password_field: PASSWORD_FIELD,
            redirect_field: REDIRECT_FIELD,
        };

        RenderedPage::html(StatusCode::OK, self.pages.login_page(&page))
            .with_header(X_ROBOTS_TAG, "noindex, nofollow")
    }
}

/// Path plus `?query` when the query is non-empty
pub fn original_url(path: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

/// Submitted redirect target if it stays on this origin, else the context root
pub fn redirect_location(target: &str, context_path: &str) -> String {
    if is_local_target(target) {
        target.to_string()
    } else {
        format!("{context_path}/")
    }
}

/// Absolute path on this origin: `/x`, never `//host` or `/\host`
fn is_local_target(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && target.bytes().all(|b| b.is_ascii_graphic())
}
