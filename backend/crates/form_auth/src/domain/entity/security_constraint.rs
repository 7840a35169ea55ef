//! Security Constraint Entity
//!
//! Static mapping from resource URL patterns to the roles allowed to reach
//! them. Servlet-style patterns: `/*` (everything), `/prefix/*`, `*.ext`, or
//! an exact path.

use crate::domain::entity::principal::Principal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConstraint {
    /// Name of the resource collection
    pub collection: String,
    pub patterns: Vec<String>,
    /// Any one of these roles grants access
    pub roles: Vec<String>,
}

impl SecurityConstraint {
    /// Constraint covering every resource and requiring `role`
    pub fn all_resources(role: impl Into<String>) -> Self {
        Self {
            collection: "all".to_string(),
            patterns: vec!["/*".to_string()],
            roles: vec![role.into()],
        }
    }

    pub fn applies_to(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern_matches(pattern, path))
    }

    /// A constraint listing no role grants nobody
    pub fn is_satisfied_by(&self, principal: &Principal) -> bool {
        self.roles.iter().any(|role| principal.has_role(role))
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern == "/*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
    }
    if let Some(extension) = pattern.strip_prefix("*.") {
        return path
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| ext == extension && !stem.ends_with('/'));
    }
    pattern == path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_resources() {
        let constraint = SecurityConstraint::all_resources("user");
        assert!(constraint.applies_to("/"));
        assert!(constraint.applies_to("/anything/at/all"));
        assert_eq!(constraint.collection, "all");
    }

    #[test]
    fn test_prefix_and_extension_patterns() {
        let constraint = SecurityConstraint {
            collection: "admin".to_string(),
            patterns: vec!["/admin/*".to_string(), "*.do".to_string()],
            roles: vec!["admin".to_string()],
        };
        assert!(constraint.applies_to("/admin"));
        assert!(constraint.applies_to("/admin/users"));
        assert!(!constraint.applies_to("/administrator"));
        assert!(constraint.applies_to("/shop/cart.do"));
        assert!(!constraint.applies_to("/shop/cart.dot"));
        assert!(!constraint.applies_to("/home"));
    }

    #[test]
    fn test_is_satisfied_by() {
        let constraint = SecurityConstraint::all_resources("user");
        assert!(constraint.is_satisfied_by(&Principal::new("alice", ["user"])));
        assert!(!constraint.is_satisfied_by(&Principal::new("bob", ["guest"])));

        let nobody = SecurityConstraint {
            roles: Vec::new(),
            ..SecurityConstraint::all_resources("user")
        };
        assert!(!nobody.is_satisfied_by(&Principal::new("alice", ["user"])));
    }
}
