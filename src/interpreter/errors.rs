//=====================================================
// File: interpreter/errors.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Error taxonomy for scenario resolution
// Objective: Separate recoverable binding failures from fatal resolution errors
//            and map every failure onto a stable diagnostic code
//=====================================================

use thiserror::Error;

use crate::contract::TransportError;
use crate::parser::ParseError;
use crate::value::ValueKind;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    NoMatch,
    TypeMismatch,
    Binding,
    Transport,
    Assertion,
    InvalidValue,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "E001",
            ErrorCode::NoMatch => "E002",
            ErrorCode::TypeMismatch => "E003",
            ErrorCode::Binding => "E004",
            ErrorCode::Transport => "E005",
            ErrorCode::Assertion => "E006",
            ErrorCode::InvalidValue => "E007",
        }
    }
}

/// One abandoned candidate recorded while searching a handler list.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub handler: String,
    pub reason: String,
}

#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    #[error("no handler matched `{name}` for `{event}` (attempted: {})", describe_attempts(.attempted))]
    NoMatch {
        kind: String,
        name: String,
        event: String,
        attempted: Vec<Attempt>,
    },
    #[error("cannot compare `{left}` to `{right}`")]
    ComparisonType { left: ValueKind, right: ValueKind },
    #[error("cannot order `{left}` against `{right}`")]
    Ordering { left: ValueKind, right: ValueKind },
    #[error(transparent)]
    Binding(#[from] BindingFailure),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("{0}")]
    InvalidValue(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ScenarioError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ScenarioError::InvalidValue(message.into())
    }

    /// Fatal errors abort the whole resolution instead of letting the
    /// dispatcher move on to the next candidate handler.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScenarioError::ComparisonType { .. }
                | ScenarioError::Ordering { .. }
                | ScenarioError::Transport(_)
                | ScenarioError::Assertion(_)
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScenarioError::NoMatch { .. } => ErrorCode::NoMatch,
            ScenarioError::ComparisonType { .. } | ScenarioError::Ordering { .. } => {
                ErrorCode::TypeMismatch
            }
            ScenarioError::Binding(_) => ErrorCode::Binding,
            ScenarioError::Transport(_) => ErrorCode::Transport,
            ScenarioError::Assertion(_) => ErrorCode::Assertion,
            ScenarioError::InvalidValue(_) => ErrorCode::InvalidValue,
            ScenarioError::Parse(_) => ErrorCode::Syntax,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code().as_str()
    }
}

/// Why a single handler could not bind its arguments. Always recoverable:
/// the dispatcher records it and tries the next candidate.
#[derive(Debug, Clone, Error)]
pub enum BindingFailure {
    #[error("missing argument `{arg}`")]
    MissingArg { arg: String },
    #[error("{count} unexpected trailing argument(s) starting at `{first}`")]
    TooManyArgs { count: usize, first: String },
    #[error("implicit argument `{arg}` has no value in slot `{slot}`")]
    ImplicitUnavailable { arg: String, slot: String },
    #[error("`{handler}` needs a sub-expression")]
    MissingSubExpression { handler: String },
    #[error("argument `{arg}`: {source}")]
    Resolve {
        arg: String,
        source: Box<ScenarioError>,
    },
    #[error("argument `{arg}` element {index}: {source}")]
    Element {
        arg: String,
        index: usize,
        source: Box<ScenarioError>,
    },
    #[error("{source}")]
    Sub { source: Box<ScenarioError> },
}

fn describe_attempts(attempted: &[Attempt]) -> String {
    if attempted.is_empty() {
        return "none".to_string();
    }
    attempted
        .iter()
        .map(|attempt| format!("{}: {}", attempt.handler, attempt.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_lists_attempted_handlers() {
        let err = ScenarioError::NoMatch {
            kind: "Core".into(),
            name: "Foo".into(),
            event: "(Foo x)".into(),
            attempted: vec![Attempt {
                handler: "Foo".into(),
                reason: "missing argument `b`".into(),
            }],
        };
        let text = err.to_string();
        assert!(text.starts_with("no handler matched `Foo` for `(Foo x)`"));
        assert!(text.contains("Foo: missing argument `b`"));
        assert_eq!(err.code_str(), "E002");
        assert!(!err.is_fatal());
    }

    #[test]
    fn comparison_errors_are_fatal() {
        let err = ScenarioError::ComparisonType {
            left: ValueKind::Map,
            right: ValueKind::Bool,
        };
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "cannot compare `MapV` to `BoolV`");
    }
}

//=====================================================
// End of file
//=====================================================
