//! Optional external interpreter consulted when local parsing fails.
//!
//! The fallback gets exactly one attempt, bounded by a timeout. Any error,
//! timeout or `unknown` answer yields the local result instead.

use std::future::Future;
use std::time::Duration;

use shared::{ParseSource, ParsedCommand};
use thiserror::Error;

use super::parse_command_simple;

/// Inputs at or below this many characters are never sent to the fallback.
pub const FALLBACK_MIN_LENGTH: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FallbackError {
    #[error("Fallback interpreter is not configured")]
    Disabled,

    #[error("Fallback timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fallback request failed: {0}")]
    Request(String),

    #[error("Fallback returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// An external command interpreter, typically a remote language model.
pub trait CommandFallback: Send + Sync {
    fn interpret(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<ParsedCommand, FallbackError>> + Send;
}

/// A fallback that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl CommandFallback for NoFallback {
    async fn interpret(&self, _input: &str) -> Result<ParsedCommand, FallbackError> {
        Err(FallbackError::Disabled)
    }
}

impl<F: CommandFallback> CommandFallback for Option<F> {
    async fn interpret(&self, input: &str) -> Result<ParsedCommand, FallbackError> {
        match self {
            Some(fallback) => fallback.interpret(input).await,
            None => Err(FallbackError::Disabled),
        }
    }
}

/// Parsed command plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub command: ParsedCommand,
    pub source: ParseSource,
}

impl Interpretation {
    pub fn local(command: ParsedCommand) -> Self {
        Self {
            command,
            source: ParseSource::Local,
        }
    }
}

/// Whether `local` is worth a second opinion.
pub fn should_use_fallback(local: &ParsedCommand, input: &str) -> bool {
    local.is_unknown() && input.trim().chars().count() > FALLBACK_MIN_LENGTH
}

/// Parse locally, then consult `fallback` once if the local result is unusable.
pub async fn parse_with_fallback<F: CommandFallback>(
    input: &str,
    fallback: &F,
    timeout: Duration,
) -> Interpretation {
    resolve_with_fallback(input, parse_command_simple(input), fallback, timeout).await
}

/// Like [`parse_with_fallback`] for a command that was already parsed locally.
pub async fn resolve_with_fallback<F: CommandFallback>(
    input: &str,
    local: ParsedCommand,
    fallback: &F,
    timeout: Duration,
) -> Interpretation {
    if !should_use_fallback(&local, input) {
        return Interpretation::local(local);
    }

    let outcome = match tokio::time::timeout(timeout, fallback.interpret(input.trim())).await {
        Ok(result) => result,
        Err(_) => Err(FallbackError::Timeout(timeout)),
    };

    match outcome {
        Ok(command) if !command.is_unknown() => {
            tracing::info!(input = input.trim(), action = ?command.action, "Fallback interpreted command");
            Interpretation {
                command,
                source: ParseSource::Fallback,
            }
        }
        Ok(_) => {
            tracing::debug!(input = input.trim(), "Fallback could not interpret command either");
            Interpretation::local(local)
        }
        Err(FallbackError::Disabled) => Interpretation::local(local),
        Err(e) => {
            tracing::warn!(input = input.trim(), "Fallback failed: {}", e);
            Interpretation::local(local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CommandAction, CommandTarget};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        answer: Result<ParsedCommand, FallbackError>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(answer: Result<ParsedCommand, FallbackError>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CommandFallback for Fixed {
        async fn interpret(&self, _input: &str) -> Result<ParsedCommand, FallbackError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    struct Slow;

    impl CommandFallback for Slow {
        async fn interpret(&self, _input: &str) -> Result<ParsedCommand, FallbackError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ParsedCommand::new(CommandAction::Clear))
        }
    }

    fn sphere() -> ParsedCommand {
        ParsedCommand {
            object_kind: Some(CommandTarget::Sphere),
            ..ParsedCommand::new(CommandAction::Create)
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_should_use_fallback() {
        let unknown = ParsedCommand::unknown("nope");
        assert!(should_use_fallback(&unknown, "conjure a shimmering orb"));
        assert!(!should_use_fallback(&unknown, "  short    "));
        assert!(!should_use_fallback(&sphere(), "create a sphere please"));
    }

    #[tokio::test]
    async fn test_local_result_skips_fallback() {
        let fallback = Fixed::new(Ok(ParsedCommand::new(CommandAction::Clear)));
        let result = parse_with_fallback("create a red sphere", &fallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
        assert_eq!(result.command.object_kind, Some(CommandTarget::Sphere));
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_for_unknown() {
        let fallback = Fixed::new(Ok(sphere()));
        let result = parse_with_fallback("conjure a shimmering orb", &fallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Fallback);
        assert_eq!(result.command, sphere());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_input_not_sent() {
        let fallback = Fixed::new(Ok(sphere()));
        let result = parse_with_fallback("orb pls", &fallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
        assert!(result.command.is_unknown());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_error_keeps_local() {
        let fallback = Fixed::new(Err(FallbackError::Request("connection refused".into())));
        let result = parse_with_fallback("conjure a shimmering orb", &fallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
        assert!(result.command.is_unknown());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_unknown_keeps_local() {
        let fallback = Fixed::new(Ok(ParsedCommand::unknown("no idea")));
        let result = parse_with_fallback("conjure a shimmering orb", &fallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
        assert_ne!(result.command.error.as_deref(), Some("no idea"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_timeout_keeps_local() {
        let result = parse_with_fallback("conjure a shimmering orb", &Slow, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
        assert!(result.command.is_unknown());
    }

    #[tokio::test]
    async fn test_disabled_fallback() {
        let result = parse_with_fallback("conjure a shimmering orb", &NoFallback, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);

        let none: Option<Fixed> = None;
        let result = parse_with_fallback("conjure a shimmering orb", &none, TIMEOUT).await;
        assert_eq!(result.source, ParseSource::Local);
    }
}
