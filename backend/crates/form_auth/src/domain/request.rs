//! Request Capability
//!
//! What the gate needs to know about an inbound request, independent of
//! any HTTP server.

use std::net::IpAddr;

use http::Method;

pub trait GateRequest {
    fn method(&self) -> &Method;

    /// Decoded request path, including the context path
    fn path(&self) -> &str;

    /// Path as it appeared on the wire, used to rebuild the original URL
    fn raw_path(&self) -> &str {
        self.path()
    }

    /// Mount prefix of the application; empty for the root context
    fn context_path(&self) -> &str;

    /// Raw query string without the leading `?`
    fn query(&self) -> Option<&str>;

    fn cookie(&self, name: &str) -> Option<String>;

    /// Submitted form field; only login submissions carry a form
    fn form_param(&self, name: &str) -> Option<String>;

    fn remote_addr(&self) -> Option<IpAddr>;
}
