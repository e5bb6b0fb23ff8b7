#![forbid(unsafe_code)]

//! Display-context providers: where the raw detected factor comes from.
//!
//! The state layer never probes the platform itself; it is handed a
//! [`DisplayContextProvider`] and treats any failure as "no new
//! information". Providers here are deliberately platform-neutral: the
//! environment-variable provider reads whatever variables it is configured
//! with through an injectable lookup, so tests never touch process
//! environment and the core never branches on operating system identity.

use std::fmt;

/// Best-effort source of a raw (unclamped) scale factor.
pub trait DisplayContextProvider: Send + Sync {
    /// Detect the current factor for the active display context.
    ///
    /// Errors are expected and recoverable; callers keep their previous
    /// factor when detection fails.
    fn detect(&self) -> Result<f64, DetectError>;
}

/// Failure to produce a detected factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// No configured source produced a value.
    Unavailable,
    /// A source produced a value that does not parse as a positive number.
    Invalid {
        /// Name of the source (e.g. the environment variable).
        var: String,
        /// The raw value that failed to parse.
        value: String,
    },
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no scale detection source available"),
            Self::Invalid { var, value } => {
                write!(f, "scale source '{var}' has unparseable value '{value}'")
            }
        }
    }
}

impl std::error::Error for DetectError {}

/// Provider returning a constant factor. Useful for tests and for forcing a
/// scale from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScale(pub f64);

impl DisplayContextProvider for FixedScale {
    fn detect(&self) -> Result<f64, DetectError> {
        Ok(self.0)
    }
}

/// Provider reading an ordered list of environment variables; the first one
/// that is set and non-empty decides.
#[derive(Debug, Clone)]
pub struct EnvScale {
    vars: Vec<String>,
}

impl EnvScale {
    /// Variables consulted by [`EnvScale::new`], in order.
    pub const DEFAULT_VARS: [&'static str; 2] = ["UISCALE", "GDK_SCALE"];

    /// Provider over the default variable list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_vars(Self::DEFAULT_VARS)
    }

    /// Provider over an explicit variable list, consulted in order.
    #[must_use]
    pub fn with_vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    /// Detect using a custom environment lookup.
    ///
    /// The first variable that is set and non-empty decides the outcome: a
    /// parseable positive number is returned, anything else is
    /// [`DetectError::Invalid`]. When no variable is set the result is
    /// [`DetectError::Unavailable`].
    pub fn detect_with<F>(&self, get_env: F) -> Result<f64, DetectError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for var in &self.vars {
            let Some(raw) = get_env(var) else { continue };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            return match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => {
                    tracing::debug!(var = %var, value, "scale factor from environment");
                    Ok(value)
                }
                _ => Err(DetectError::Invalid {
                    var: var.clone(),
                    value: trimmed.to_string(),
                }),
            };
        }
        Err(DetectError::Unavailable)
    }
}

impl Default for EnvScale {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayContextProvider for EnvScale {
    fn detect(&self) -> Result<f64, DetectError> {
        self.detect_with(|var| std::env::var(var).ok())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn fixed_provider() {
        assert_eq!(FixedScale(1.5).detect(), Ok(1.5));
    }

    #[test]
    fn env_first_variable_wins() {
        let provider = EnvScale::new();
        let result = provider.detect_with(env(&[("UISCALE", "2"), ("GDK_SCALE", "3")]));
        assert_eq!(result, Ok(2.0));
    }

    #[test]
    fn env_falls_through_unset_and_empty() {
        let provider = EnvScale::new();
        let result = provider.detect_with(env(&[("UISCALE", "  "), ("GDK_SCALE", "1.5")]));
        assert_eq!(result, Ok(1.5));
    }

    #[test]
    fn env_unset_is_unavailable() {
        let provider = EnvScale::new();
        assert_eq!(provider.detect_with(env(&[])), Err(DetectError::Unavailable));
    }

    #[test]
    fn env_garbage_is_invalid() {
        let provider = EnvScale::new();
        let result = provider.detect_with(env(&[("UISCALE", "huge")]));
        assert_eq!(
            result,
            Err(DetectError::Invalid {
                var: "UISCALE".to_string(),
                value: "huge".to_string(),
            })
        );
    }

    #[test]
    fn env_rejects_non_positive() {
        let provider = EnvScale::new();
        assert!(provider.detect_with(env(&[("UISCALE", "0")])).is_err());
        assert!(provider.detect_with(env(&[("UISCALE", "-2")])).is_err());
        assert!(provider.detect_with(env(&[("UISCALE", "inf")])).is_err());
    }

    #[test]
    fn custom_variable_list() {
        let provider = EnvScale::with_vars(["MY_SCALE"]);
        assert_eq!(provider.detect_with(env(&[("MY_SCALE", "1.25")])), Ok(1.25));
        assert_eq!(
            provider.detect_with(env(&[("UISCALE", "2")])),
            Err(DetectError::Unavailable)
        );
    }

    #[test]
    fn error_display() {
        let err = DetectError::Invalid {
            var: "UISCALE".to_string(),
            value: "x".to_string(),
        };
        assert!(err.to_string().contains("UISCALE"));
        assert!(DetectError::Unavailable.to_string().contains("no scale"));
    }
}
