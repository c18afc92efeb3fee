//=====================================================
// File: event/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Parsed scenario expression tree
// Objective: Provide the immutable token/sequence tree every handler consumes
//=====================================================

use std::fmt;

/// A parsed scenario expression: an opaque token or an ordered sequence of
/// sub-expressions. Never mutated once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    Token(String),
    Seq(Vec<Event>),
}

impl Event {
    pub fn token(text: impl Into<String>) -> Self {
        Event::Token(text.into())
    }

    pub fn seq(items: impl IntoIterator<Item = Event>) -> Self {
        Event::Seq(items.into_iter().collect())
    }

    /// Build a flat sequence of tokens, e.g. `["Foo", "Address"]`.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        Event::Seq(tokens.iter().map(|token| Event::token(*token)).collect())
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Event::Token(text) => Some(text),
            Event::Seq(_) => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Event]> {
        match self {
            Event::Token(_) => None,
            Event::Seq(items) => Some(items),
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Event::Token(_))
    }

    /// The token naming this expression: the token itself, or the first
    /// element of a sequence when that element is a token.
    pub fn head(&self) -> Option<&str> {
        match self {
            Event::Token(text) => Some(text),
            Event::Seq(items) => items.first().and_then(Event::as_token),
        }
    }

    /// Positional view used by the dispatcher. A bare token behaves like a
    /// one-element sequence.
    pub fn elements(&self) -> &[Event] {
        match self {
            Event::Token(_) => std::slice::from_ref(self),
            Event::Seq(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Event::Seq(items) if items.is_empty())
    }
}

impl From<&str> for Event {
    fn from(value: &str) -> Self {
        Event::token(value)
    }
}

impl From<Vec<Event>> for Event {
    fn from(value: Vec<Event>) -> Self {
        Event::Seq(value)
    }
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '\\'))
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Token(text) if needs_quotes(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
            Event::Token(text) => f.write_str(text),
            Event::Seq(items) => {
                f.write_str("(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}


//=====================================================
// End of file
//=====================================================
