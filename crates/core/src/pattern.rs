use regex::bytes::Regex;
use thiserror::Error;

/// One piece of a source template: either text that must appear verbatim or a
/// `%N{regex}` token that becomes a capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePart {
    Literal(String),
    Token { index: u32, fragment: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("invalid regular expression in token %{index}{{{fragment}}}: {message}")]
    InvalidFragment {
        index: u32,
        fragment: String,
        message: String,
    },
    #[error("source pattern is not a valid regular expression: {0}")]
    Invalid(String),
}

/// A source template compiled into a whole-name matcher.
///
/// Token groups are bound by position of occurrence: the first `%N{..}` in the
/// template fills `%1` in the destination, the second fills `%2`, and so on,
/// whatever number the user wrote after the `%`.
///
/// Matching runs over raw name bytes so file names that are not valid UTF-8
/// can still be matched, e.g. with `(?-u:.)` inside a token.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    source: String,
    regex: Regex,
    group_names: Vec<String>,
    declared_indices: Vec<u32>,
}

impl TokenPattern {
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let parts = parse_source_template(source);
        let expr = assemble_expression(&parts, usize::MAX);
        let regex = Regex::new(&expr).map_err(|err| blame_fragment(&parts, err))?;
        tracing::debug!(source, expr = regex.as_str(), "compiled source pattern");

        let mut group_names = Vec::new();
        let mut declared_indices = Vec::new();
        for part in &parts {
            if let SourcePart::Token { index, .. } = part {
                group_names.push(group_name(group_names.len()));
                declared_indices.push(*index);
            }
        }

        Ok(Self {
            source: source.to_string(),
            regex,
            group_names,
            declared_indices,
        })
    }

    /// Matches a bare file name against the whole pattern and returns the
    /// captured token values in occurrence order. A token that did not take
    /// part in the match (an untaken alternation branch) yields an empty
    /// slice.
    pub fn captures_bytes<'h>(&self, name: &'h [u8]) -> Option<Vec<&'h [u8]>> {
        let caps = self.regex.captures(name)?;
        Some(
            self.group_names
                .iter()
                .map(|group| caps.name(group).map_or(&b""[..], |m| m.as_bytes()))
                .collect(),
        )
    }

    pub fn captures(&self, name: &str) -> Option<Vec<String>> {
        let caps = self.captures_bytes(name.as_bytes())?;
        Some(
            caps.into_iter()
                .map(|value| String::from_utf8_lossy(value).into_owned())
                .collect(),
        )
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name.as_bytes())
    }

    pub fn group_count(&self) -> usize {
        self.group_names.len()
    }

    /// The numbers written after `%` in the template, in occurrence order.
    /// Informational only; they do not affect group binding.
    pub fn declared_indices(&self) -> &[u32] {
        &self.declared_indices
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

// Tokens at position `live` and beyond are emitted as empty groups, which
// lets `blame_fragment` compile the template one fragment at a time.
fn assemble_expression(parts: &[SourcePart], live: usize) -> String {
    let mut expr = String::from("^(?:");
    let mut position = 0;
    for part in parts {
        match part {
            SourcePart::Literal(text) => expr.push_str(&regex::escape(text)),
            SourcePart::Token { fragment, .. } => {
                let name = group_name(position);
                let body = if position < live { fragment.as_str() } else { "" };
                expr.push_str(&format!("(?P<{name}>{body})"));
                position += 1;
            }
        }
    }
    expr.push_str(")$");
    expr
}

/// Splits a source template into literal runs and `%N{regex}` tokens.
///
/// A `%` that does not start a complete token (digits, `{`, at least one
/// character, `}`) is kept as literal text.
pub fn parse_source_template(input: &str) -> Vec<SourcePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('%') {
        literal.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match scan_token(candidate) {
            Some((token, consumed)) => {
                if !literal.is_empty() {
                    parts.push(SourcePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(token);
                rest = &candidate[consumed..];
            }
            None => {
                literal.push('%');
                rest = &candidate[1..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(SourcePart::Literal(literal));
    }

    parts
}

// `input` starts with '%'. Returns the token and the number of bytes it spans.
fn scan_token(input: &str) -> Option<(SourcePart, usize)> {
    let body = &input[1..];
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let inner = body[digits..].strip_prefix('{')?;
    let close = inner.find('}')?;
    if close == 0 {
        return None;
    }

    let index = body[..digits].parse::<u32>().unwrap_or(u32::MAX);
    let token = SourcePart::Token {
        index,
        fragment: inner[..close].to_string(),
    };
    Some((token, 1 + digits + 1 + close + 1))
}

fn group_name(position: usize) -> String {
    format!("tok{position}")
}

/// Finds the first token whose fragment breaks the expression, compiling the
/// template with only the tokens up to and including it filled in.
fn blame_fragment(parts: &[SourcePart], err: regex::Error) -> PatternError {
    let tokens = parts.iter().filter_map(|part| match part {
        SourcePart::Token { index, fragment } => Some((*index, fragment)),
        SourcePart::Literal(_) => None,
    });

    for (position, (index, fragment)) in tokens.enumerate() {
        if let Err(prefix_err) = Regex::new(&assemble_expression(parts, position + 1)) {
            return PatternError::InvalidFragment {
                index,
                fragment: fragment.clone(),
                message: prefix_err.to_string(),
            };
        }
    }
    PatternError::Invalid(err.to_string())
}
