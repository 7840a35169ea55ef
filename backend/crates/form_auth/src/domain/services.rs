//! Domain Services
//!
//! Pure domain logic: which paths need authentication, and how a user name
//! is bound to the server secret.

use platform::crypto::{constant_time_eq, sha256_hex};

use crate::domain::value_object::{AuthSecret, IdentityProof, UrlPattern};

// ============================================================================
// Pattern gate
// ============================================================================

/// Strip the mount prefix from a request path
///
/// `None` when the path does not live under `context_path`. The root context
/// is the empty string.
pub fn context_relative_path<'a>(request_path: &'a str, context_path: &str) -> Option<&'a str> {
    request_path.strip_prefix(context_path)
}

/// Decide whether a context-relative path is exempt from authentication
///
/// A match on `exclude` wins outright. Otherwise, when `include` is set, a
/// path it does not match is exempt. Anything left requires authentication.
pub fn should_skip(
    context_relative_path: &str,
    exclude: Option<&UrlPattern>,
    include: Option<&UrlPattern>,
) -> bool {
    if let Some(exclude) = exclude {
        if exclude.matches(context_relative_path) {
            return true;
        }
    }

    if let Some(include) = include {
        if !include.matches(context_relative_path) {
            return true;
        }
    }

    false
}

/// [`should_skip`] on a raw request path, failing closed on a prefix mismatch
pub fn skip_authentication(
    request_path: &str,
    context_path: &str,
    exclude: Option<&UrlPattern>,
    include: Option<&UrlPattern>,
) -> bool {
    let Some(relative) = context_relative_path(request_path, context_path) else {
        tracing::warn!(
            request_path,
            context_path,
            "Request path outside context path, requiring authentication"
        );
        return false;
    };

    let skip = should_skip(relative, exclude, include);

    tracing::debug!(
        request_path,
        context_relative_path = relative,
        exclude = exclude.map(UrlPattern::as_str),
        include = include.map(UrlPattern::as_str),
        skip,
        "Evaluated URL patterns"
    );

    skip
}

// ============================================================================
// Proof codec
// ============================================================================

/// Lowercase hex SHA-256 of `secret ":" username`
pub fn proof_digest(username: &str, secret: &AuthSecret) -> String {
    sha256_hex(&[secret.expose().as_bytes(), ":".as_bytes(), username.as_bytes()])
}

/// Mint the cookie pair for `username`
///
/// The user name is percent-encoded so names containing `;`, `=`, spaces or
/// non-ASCII characters survive the `Cookie` header.
pub fn mint(username: &str, secret: &AuthSecret) -> IdentityProof {
    IdentityProof::new(
        urlencoding::encode(username).into_owned(),
        proof_digest(username, secret),
    )
}

/// Check a cookie pair against the current secret
///
/// Returns the proven user name, or `None` if a value is missing or empty,
/// the user name does not decode, or the digest differs.
pub fn verify(
    username_cookie: Option<&str>,
    proof_cookie: Option<&str>,
    secret: &AuthSecret,
) -> Option<String> {
    let username_cookie = username_cookie.filter(|v| !v.is_empty())?;
    let proof_cookie = proof_cookie.filter(|v| !v.is_empty())?;

    let username = urlencoding::decode(username_cookie).ok()?;
    if username.is_empty() {
        return None;
    }

    let expected = proof_digest(&username, secret);
    if constant_time_eq(expected.as_bytes(), proof_cookie.as_bytes()) {
        Some(username.into_owned())
    } else {
        None
    }
}
