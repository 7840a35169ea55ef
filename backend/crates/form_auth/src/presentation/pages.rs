//! Default HTML Pages
//!
//! Minimal, dependency-free login and error pages. Deployments that want
//! their own look implement [`PageRenderer`] instead.

use crate::domain::page::{LoginPage, PageRenderer};

/// Built-in renderer
#[derive(Debug, Clone)]
pub struct HtmlPages {
    title: String,
}

impl Default for HtmlPages {
    fn default() -> Self {
        Self::new("Login")
    }
}

impl HtmlPages {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl PageRenderer for HtmlPages {
    fn login_page(&self, page: &LoginPage) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="robots" content="noindex, nofollow">
<title>{title}</title>
</head>
<body>
<form method="post" action="{action}">
<p><label>User name <input type="text" name="{username_field}" autocomplete="username" autofocus required></label></p>
<p><label>Password <input type="password" name="{password_field}" autocomplete="current-password" required></label></p>
<input type="hidden" name="{redirect_field}" value="{redirect}">
<p><button type="submit">Log in</button></p>
</form>
</body>
</html>
"#,
            title = escape_html(&self.title),
            action = escape_html(&page.form_action),
            username_field = escape_html(page.username_field),
            password_field = escape_html(page.password_field),
            redirect_field = escape_html(page.redirect_field),
            redirect = escape_html(&page.redirect_target),
        )
    }

    fn error_page(&self) -> String {
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="robots" content="noindex, nofollow">
<title>Authentication Error</title>
</head>
<body>
<h1>Authentication Error</h1>
<p>The user name or password is incorrect.</p>
</body>
</html>
"#
        .to_string()
    }
}

/// Escape text for use in HTML content and double- or single-quoted attributes
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(redirect_target: &str) -> LoginPage {
        LoginPage {
            form_action: "/myapp/j_security_check".to_string(),
            redirect_target: redirect_target.to_string(),
            username_field: "j_username",
            password_field: "j_password",
            redirect_field: "j_redirect",
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<&>\"' and text"),
            "&lt;&amp;&gt;&quot;&#39; and text"
        );
        assert_eq!(escape_html("/home?a=1"), "/home?a=1");
    }

    #[test]
    fn test_login_page_fields() {
        let html = HtmlPages::default().login_page(&page("/home?a=1&b=2"));
        assert!(html.contains(r#"action="/myapp/j_security_check""#));
        assert!(html.contains(r#"name="j_username""#));
        assert!(html.contains(r#"type="password" name="j_password""#));
        assert!(html.contains(r#"name="j_redirect" value="/home?a=1&amp;b=2""#));
        assert!(html.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
    }

    #[test]
    fn test_login_page_escapes_redirect_target() {
        let html = HtmlPages::default().login_page(&page(r#"/x"><script>alert(1)</script>"#));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_error_page_is_fixed() {
        let pages = HtmlPages::default();
        assert_eq!(pages.error_page(), pages.error_page());
        assert!(pages.error_page().contains("Authentication Error"));
    }
}
