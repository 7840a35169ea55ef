//! Runtime Settings
//!
//! The include/exclude patterns and the secret may change while requests
//! are in flight. Each request loads one immutable snapshot and uses it from
//! start to finish, so it never sees an include pattern from one
//! configuration paired with an exclude pattern from another.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::application::config::GateConfig;
use crate::domain::value_object::{AuthSecret, UrlPattern};
use crate::error::{GateResult, PatternKind};

/// One consistent view of the reconfigurable settings
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub include: Option<UrlPattern>,
    pub exclude: Option<UrlPattern>,
    pub secret: AuthSecret,
}

impl GateSettings {
    /// Compile the configured patterns; a missing secret becomes a random one
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        let include = compile(PatternKind::Include, config.include_pattern.as_deref())?;
        let exclude = compile(PatternKind::Exclude, config.exclude_pattern.as_deref())?;
        let secret = match &config.secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::info!("No authentication secret configured, generated a random one");
                AuthSecret::random()
            }
        };

        Ok(Self {
            include,
            exclude,
            secret,
        })
    }
}

fn compile(kind: PatternKind, source: Option<&str>) -> GateResult<Option<UrlPattern>> {
    source.map(|source| UrlPattern::new(kind, source)).transpose()
}

/// Shared, atomically replaceable settings
pub struct GateSettingsHandle {
    current: ArcSwap<GateSettings>,
}

impl GateSettingsHandle {
    pub fn new(settings: GateSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// Settings for one request
    pub fn snapshot(&self) -> Arc<GateSettings> {
        self.current.load_full()
    }

    /// Replace the include pattern; `None` clears it
    ///
    /// An invalid pattern is rejected and the previous one stays in effect.
    pub fn set_include_pattern(&self, source: Option<&str>) -> GateResult<()> {
        let include = compile(PatternKind::Include, source).inspect_err(|e| e.log())?;
        self.current.rcu(|current| GateSettings {
            include: include.clone(),
            ..GateSettings::clone(current)
        });
        tracing::info!(include = source, "Include pattern updated");
        Ok(())
    }

    /// Replace the exclude pattern; `None` clears it
    ///
    /// An invalid pattern is rejected and the previous one stays in effect.
    pub fn set_exclude_pattern(&self, source: Option<&str>) -> GateResult<()> {
        let exclude = compile(PatternKind::Exclude, source).inspect_err(|e| e.log())?;
        self.current.rcu(|current| GateSettings {
            exclude: exclude.clone(),
            ..GateSettings::clone(current)
        });
        tracing::info!(exclude = source, "Exclude pattern updated");
        Ok(())
    }

    /// Install a new secret; every proof minted under the old one stops verifying
    pub fn set_secret(&self, secret: &str) -> GateResult<()> {
        let secret = AuthSecret::new(secret).inspect_err(|e| e.log())?;
        self.install_secret(secret);
        Ok(())
    }

    /// Install a fresh random secret
    pub fn rotate_secret(&self) {
        self.install_secret(AuthSecret::random());
    }

    fn install_secret(&self, secret: AuthSecret) {
        self.current.rcu(|current| GateSettings {
            secret: secret.clone(),
            ..GateSettings::clone(current)
        });
        tracing::info!("Authentication secret replaced");
    }

    pub fn include_pattern(&self) -> Option<String> {
        self.current
            .load()
            .include
            .as_ref()
            .map(|p| p.as_str().to_string())
    }

    pub fn exclude_pattern(&self) -> Option<String> {
        self.current
            .load()
            .exclude
            .as_ref()
            .map(|p| p.as_str().to_string())
    }
}

impl std::fmt::Debug for GateSettingsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateSettingsHandle")
            .field("current", &*self.current.load_full())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services;
    use crate::domain::value_object::DEFAULT_EXCLUDE_PATTERN;
    use crate::error::GateError;

    fn handle() -> GateSettingsHandle {
        GateSettingsHandle::new(GateSettings::from_config(&GateConfig::default()).unwrap())
    }

    #[test]
    fn test_from_config() {
        let settings = GateSettings::from_config(&GateConfig::default()).unwrap();
        assert!(settings.include.is_none());
        assert_eq!(
            settings.exclude.as_ref().map(UrlPattern::as_str),
            Some(DEFAULT_EXCLUDE_PATTERN)
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_pattern() {
        let config = GateConfig {
            include_pattern: Some("([".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            GateSettings::from_config(&config),
            Err(GateError::InvalidPattern {
                kind: PatternKind::Include,
                ..
            })
        ));
    }

    #[test]
    fn test_set_patterns() {
        let handle = handle();
        handle.set_include_pattern(Some("/secure/.*")).unwrap();
        assert_eq!(handle.include_pattern().as_deref(), Some("/secure/.*"));

        handle.set_exclude_pattern(None).unwrap();
        assert_eq!(handle.exclude_pattern(), None);

        handle.set_include_pattern(None).unwrap();
        assert_eq!(handle.include_pattern(), None);
    }

    #[test]
    fn test_invalid_pattern_keeps_previous() {
        let handle = handle();
        handle.set_include_pattern(Some("/secure/.*")).unwrap();

        assert!(handle.set_include_pattern(Some("([")).is_err());
        assert!(handle.set_exclude_pattern(Some("*")).is_err());

        assert_eq!(handle.include_pattern().as_deref(), Some("/secure/.*"));
        assert_eq!(handle.exclude_pattern().as_deref(), Some(DEFAULT_EXCLUDE_PATTERN));
    }

    #[test]
    fn test_snapshot_is_stable_across_updates() {
        let handle = handle();
        let before = handle.snapshot();
        handle.set_exclude_pattern(Some("/static/.*")).unwrap();

        assert_eq!(
            before.exclude.as_ref().map(UrlPattern::as_str),
            Some(DEFAULT_EXCLUDE_PATTERN)
        );
        assert_eq!(
            handle.snapshot().exclude.as_ref().map(UrlPattern::as_str),
            Some("/static/.*")
        );
    }

    #[test]
    fn test_rotate_secret_invalidates_proofs() {
        let handle = handle();
        let proof = services::mint("alice", &handle.snapshot().secret);

        handle.rotate_secret();

        let verified = services::verify(
            Some(proof.username_cookie.as_str()),
            Some(proof.proof_cookie.as_str()),
            &handle.snapshot().secret,
        );
        assert_eq!(verified, None);
    }

    #[test]
    fn test_set_secret() {
        let handle = handle();
        handle.set_secret("shared").unwrap();
        assert!(matches!(handle.set_secret(""), Err(GateError::EmptySecret)));
        let proof = services::mint("alice", &AuthSecret::new("shared").unwrap());

        let verified = services::verify(
            Some(proof.username_cookie.as_str()),
            Some(proof.proof_cookie.as_str()),
            &handle.snapshot().secret,
        );
        assert_eq!(verified.as_deref(), Some("alice"));
    }
}
