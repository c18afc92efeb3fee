//=============================================
// scenario/parser.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Scenario line parser
// Objective: Turn whitespace/parenthesis delimited scenario text into Event trees
//=============================================

//=============================================
//            Section 1: Imports
//=============================================

use std::iter::Peekable;
use std::str::CharIndices;

use crate::event::Event;

//=============================================
//            Section 2: Parse Errors
//=============================================

/// Location of a character inside a scenario script (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Parser error types
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedCloseParen { position: Position },
    UnclosedParen { position: Position },
    UnterminatedString { position: Position },
    Empty { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedCloseParen { position }
            | ParseError::UnclosedParen { position }
            | ParseError::UnterminatedString { position }
            | ParseError::Empty { position } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedCloseParen { position } => write!(
                f,
                "Unexpected `)` at line {}, column {}",
                position.line, position.column
            ),
            ParseError::UnclosedParen { position } => write!(
                f,
                "Unclosed `(` opened at line {}, column {}",
                position.line, position.column
            ),
            ParseError::UnterminatedString { position } => write!(
                f,
                "Unterminated string starting at line {}, column {}",
                position.line, position.column
            ),
            ParseError::Empty { position } => write!(
                f,
                "Expected an expression at line {}, column {}",
                position.line, position.column
            ),
        }
    }
}

impl std::error::Error for ParseError {}

//=============================================
//            Section 3: Script Lines
//=============================================

/// One executable line of a scenario script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub number: usize,
    pub text: String,
    pub event: Event,
}

/// Parse a single expression. Blank or comment-only input is an error.
pub fn parse_event(source: &str) -> Result<Event, ParseError> {
    parse_line(source, 1)?.ok_or(ParseError::Empty {
        position: Position::new(1, 1),
    })
}

/// Parse every executable line of a script, stopping at the first error.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ParseError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        if let Some(event) = parse_line(text, number)? {
            lines.push(ScriptLine {
                number,
                text: text.trim().to_string(),
                event,
            });
        }
    }
    Ok(lines)
}

//Function: parse_line
//Purpose: Parse one physical line into an Event
//Inputs: text: &str, line: usize (1-based, used for positions)
//Returns: Ok(None) for blank/comment lines, Ok(Some(event)) otherwise
pub fn parse_line(text: &str, line: usize) -> Result<Option<Event>, ParseError> {
    LineParser::new(text, line).parse()
}

//=============================================
//            Section 4: Line Parser
//=============================================

struct LineParser<'a> {
    chars: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> LineParser<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            line,
        }
    }

    fn position(&self, offset: usize) -> Position {
        Position::new(self.line, offset + 1)
    }

    fn parse(mut self) -> Result<Option<Event>, ParseError> {
        let mut open: Vec<(Vec<Event>, Position)> = Vec::new();
        let mut current: Vec<Event> = Vec::new();

        while let Some((offset, ch)) = self.chars.next() {
            let position = self.position(offset);
            match ch {
                c if c.is_whitespace() => {}
                '#' => break,
                '-' if matches!(self.chars.peek(), Some((_, '-'))) => break,
                '(' => open.push((std::mem::take(&mut current), position)),
                ')' => {
                    let (parent, _) = open
                        .pop()
                        .ok_or(ParseError::UnexpectedCloseParen { position })?;
                    let group = std::mem::replace(&mut current, parent);
                    current.push(Event::Seq(group));
                }
                '"' => current.push(self.quoted(position)?),
                other => current.push(self.bare(other)),
            }
        }

        if let Some((_, position)) = open.pop() {
            return Err(ParseError::UnclosedParen { position });
        }

        Ok(match current.len() {
            0 => None,
            1 => current.pop(),
            _ => Some(Event::Seq(current)),
        })
    }

    fn quoted(&mut self, start: Position) -> Result<Event, ParseError> {
        let mut text = String::new();
        while let Some((_, ch)) = self.chars.next() {
            match ch {
                '\\' => {
                    if let Some((_, escaped)) = self.chars.next() {
                        text.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            other => other,
                        });
                    }
                }
                '"' => return Ok(Event::Token(text)),
                other => text.push(other),
            }
        }
        Err(ParseError::UnterminatedString { position: start })
    }

    fn bare(&mut self, first: char) -> Event {
        let mut text = String::from(first);
        while let Some(&(_, next)) = self.chars.peek() {
            if next.is_whitespace() || matches!(next, '(' | ')' | '"') {
                break;
            }
            text.push(next);
            self.chars.next();
        }
        Event::Token(text)
    }
}


//=============================================
// End of file
//=============================================
