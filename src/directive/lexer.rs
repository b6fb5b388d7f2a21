//! Tokenizer for a single directive line (the text after `wire::`).

use crate::error::{Diagnostic, Result, WireError};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare run of non-whitespace characters
    Word(String),
    /// Double-quoted string with `\"` and `\\` escapes resolved
    Quoted(String),
    /// `-Name` (the leading dash is not part of the name)
    FlagName(String),
    /// `=` directly after a flag name
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based column within the lexed text
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Just produced a flag name; an immediate `=` belongs to it
    AfterFlagName,
    /// Just produced `=`; the next characters are the value, verbatim
    AfterEquals,
}

pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    mode: Mode,
    last_flag: String,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            mode: Mode::Normal,
            last_flag: String::new(),
        }
    }

    pub fn tokenize(text: &'a str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(text);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        match self.mode {
            Mode::AfterFlagName => {
                self.mode = Mode::Normal;
                if let Some((pos, '=')) = self.chars.peek().copied() {
                    self.chars.next();
                    self.mode = Mode::AfterEquals;
                    return Ok(Some(Token {
                        kind: TokenKind::Equals,
                        column: pos + 1,
                    }));
                }
            }
            Mode::AfterEquals => {
                self.mode = Mode::Normal;
                return match self.chars.peek().copied() {
                    Some((pos, '"')) => self.quoted(pos).map(Some),
                    Some((pos, c)) if !c.is_whitespace() => Ok(Some(self.word(pos))),
                    _ => Err(WireError::syntax(
                        Diagnostic::new(format!("flag `-{}=` is missing a value", self.last_flag))
                            .with_context("flag", self.last_flag.clone()),
                    )),
                };
            }
            Mode::Normal => {}
        }

        while let Some((_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }

        let Some((pos, c)) = self.chars.peek().copied() else {
            return Ok(None);
        };

        match c {
            '"' => self.quoted(pos).map(Some),
            '-' => {
                let mut ahead = self.chars.clone();
                ahead.next();
                match ahead.peek() {
                    Some((_, n)) if n.is_ascii_alphabetic() => {
                        self.chars.next();
                        Ok(Some(self.flag(pos)))
                    }
                    // a lone dash or "-5" is an ordinary word
                    _ => Ok(Some(self.word(pos))),
                }
            }
            _ => Ok(Some(self.word(pos))),
        }
    }

    fn flag(&mut self, pos: usize) -> Token {
        let mut name = String::new();
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        self.last_flag.clone_from(&name);
        self.mode = Mode::AfterFlagName;
        Token {
            kind: TokenKind::FlagName(name),
            column: pos + 1,
        }
    }

    fn word(&mut self, pos: usize) -> Token {
        let mut text = String::new();
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        Token {
            kind: TokenKind::Word(text),
            column: pos + 1,
        }
    }

    fn quoted(&mut self, pos: usize) -> Result<Token> {
        self.chars.next();
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(unterminated(pos)),
                Some((_, '"')) => break,
                Some((esc_pos, '\\')) => match self.chars.next() {
                    Some((_, '"')) => text.push('"'),
                    Some((_, '\\')) => text.push('\\'),
                    Some((_, other)) => {
                        return Err(WireError::syntax(
                            Diagnostic::new(format!(
                                "unsupported escape `\\{}` in quoted string",
                                other
                            ))
                            .with_context("column", (esc_pos + 1).to_string()),
                        ))
                    }
                    None => return Err(unterminated(pos)),
                },
                Some((_, c)) => text.push(c),
            }
        }
        Ok(Token {
            kind: TokenKind::Quoted(text),
            column: pos + 1,
        })
    }
}

fn unterminated(pos: usize) -> WireError {
    WireError::syntax(
        Diagnostic::new("unterminated quoted string in directive")
            .with_context("column", (pos + 1).to_string()),
    )
}
