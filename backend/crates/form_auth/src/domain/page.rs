//! Page Rendering Collaborator
//!
//! Produces the HTML bodies of the login and error pages. Status, content
//! type and marker headers are set by the gate, whatever the renderer.

/// Everything a login form needs to post back to the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPage {
    /// URL the form posts to (context path + login action)
    pub form_action: String,
    /// Where to send the user after a successful login
    pub redirect_target: String,
    pub username_field: &'static str,
    pub password_field: &'static str,
    pub redirect_field: &'static str,
}

pub trait PageRenderer: Send + Sync {
    fn login_page(&self, page: &LoginPage) -> String;

    /// Fixed body; never carries request-specific detail
    fn error_page(&self) -> String;
}
