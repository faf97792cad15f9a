//! Annotation tag parser
//!
//! Grammar:
//!
//! ```text
//! tag           := mapper_part ("," validator_part)?
//! mapper_part   := token (";" token)*
//! validator_part:= token (";" token)*
//! token         := name ("=" arg ("&" arg)*)?
//! ```
//!
//! A tag without a comma is validator-only. The tag splits at its first comma,
//! so only the validator part may contain further commas (inside `regex`
//! arguments, for instance). Empty tokens are skipped and tokens are trimmed.

use crate::error::{ConfigError, ConfigResult};

/// One `name=arg&arg` token of a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Generator name
    pub name: String,
    /// Raw string arguments, in order
    pub args: Vec<String>,
    /// Byte offset of the token inside the tag
    pub position: usize,
}

/// Parsed but unresolved tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSpec {
    /// Mapper tokens, applied left to right
    pub mappers: Vec<Token>,
    /// Validator tokens, each applied to the mapped value
    pub validators: Vec<Token>,
}

impl TagSpec {
    /// Whether the tag names no generator at all
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty() && self.validators.is_empty()
    }
}

/// Parse a tag into mapper and validator tokens
pub fn parse_tag(tag: &str) -> ConfigResult<TagSpec> {
    TagParser::new(tag).parse()
}

/// Tag parser keeping byte offsets for error reporting
pub struct TagParser<'a> {
    input: &'a str,
}

impl<'a> TagParser<'a> {
    /// Create a new parser for the given tag
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the whole tag
    pub fn parse(self) -> ConfigResult<TagSpec> {
        let (mapper_part, validator_part, validator_offset) = match self.input.find(',') {
            Some(comma) => (&self.input[..comma], &self.input[comma + 1..], comma + 1),
            None => ("", self.input, 0),
        };

        Ok(TagSpec {
            mappers: self.parse_part(mapper_part, 0)?,
            validators: self.parse_part(validator_part, validator_offset)?,
        })
    }

    /// Parse a `;`-separated list of tokens starting at `offset`
    fn parse_part(&self, part: &str, offset: usize) -> ConfigResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut position = offset;

        for raw in part.split(';') {
            let token_offset = position + (raw.len() - raw.trim_start().len());
            position += raw.len() + 1;

            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            tokens.push(self.parse_token(raw, token_offset)?);
        }

        Ok(tokens)
    }

    /// Parse a single `name=arg&arg` token
    fn parse_token(&self, raw: &str, position: usize) -> ConfigResult<Token> {
        let (name, args) = match raw.split_once('=') {
            Some((name, rest)) => (name.trim(), rest.split('&').map(str::to_string).collect()),
            None => (raw, Vec::new()),
        };

        if name.is_empty() {
            return Err(ConfigError::malformed(
                self.input,
                position,
                format!("token '{}' has no generator name", raw),
            ));
        }

        if let Some(bad) = name.find(|c: char| c.is_whitespace()) {
            return Err(ConfigError::malformed(
                self.input,
                position + bad,
                format!("generator name '{}' contains whitespace", name),
            ));
        }

        Ok(Token {
            name: name.to_string(),
            args,
            position,
        })
    }
}
