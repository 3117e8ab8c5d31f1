//! `${VAR}` expansion in configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Bare `$VAR` is left as is. An unset variable without a default is an
/// error naming `field`, so a missing secret is reported against the key
/// that asked for it.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| match std::env::var(name) {
        Ok(found) => Ok(Some(found)),
        Err(_) => Err(UnsetVar(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that had no value and no default.
struct UnsetVar(String);

/// Expand `value` in place when present.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value {
        *v = expand_env(v, field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_project_id() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SITEPULL_TEST_PROJECT", "abc123");
        }
        let result = expand_env("${SITEPULL_TEST_PROJECT}", "sanity.project_id").unwrap();
        assert_eq!(result, "abc123");
        unsafe {
            std::env::remove_var("SITEPULL_TEST_PROJECT");
        }
    }

    #[test]
    fn test_expand_empty_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SITEPULL_TEST_UNSET_TOKEN");
        }
        let result = expand_env("${SITEPULL_TEST_UNSET_TOKEN:-}", "sanity.token").unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_expand_default_used() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SITEPULL_TEST_UNSET_DATASET");
        }
        let result =
            expand_env("${SITEPULL_TEST_UNSET_DATASET:-staging}", "sanity.dataset").unwrap();
        assert_eq!(result, "staging");
    }

    #[test]
    fn test_expand_missing_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SITEPULL_TEST_MISSING");
        }
        let err = expand_env("${SITEPULL_TEST_MISSING}", "sanity.token").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("SITEPULL_TEST_MISSING"));
        assert!(message.contains("sanity.token"));
    }

    #[test]
    fn test_expand_embedded() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SITEPULL_TEST_ENV", "prod");
        }
        let result = expand_env("site-${SITEPULL_TEST_ENV}", "sanity.dataset").unwrap();
        assert_eq!(result, "site-prod");
        unsafe {
            std::env::remove_var("SITEPULL_TEST_ENV");
        }
    }

    #[test]
    fn test_bare_dollar_untouched() {
        assert_eq!(expand_env("$HOME", "sanity.token").unwrap(), "$HOME");
    }

    #[test]
    fn test_expand_opt_none() {
        let mut value = None;
        expand_opt(&mut value, "sanity.token").unwrap();
        assert_eq!(value, None);
    }
}
