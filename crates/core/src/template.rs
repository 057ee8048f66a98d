#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPart {
    Literal(String),
    /// The digits written after `%`, kept verbatim so an unresolved
    /// reference can be emitted unchanged.
    Reference(String),
}

/// Splits a destination template into literal text and `%N` references.
///
/// Each `%` takes the longest run of ASCII digits that follows it, so `%10`
/// is always reference ten and never reference one followed by `0`.
pub fn parse_destination_template(input: &str) -> Vec<DestinationPart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            literal.push(ch);
            continue;
        }

        let mut digits = String::new();
        while let Some(&next) = chars.peek() {
            if !next.is_ascii_digit() {
                break;
            }
            digits.push(next);
            chars.next();
        }

        if digits.is_empty() {
            literal.push('%');
            continue;
        }
        if !literal.is_empty() {
            parts.push(DestinationPart::Literal(std::mem::take(&mut literal)));
        }
        parts.push(DestinationPart::Reference(digits));
    }

    if !literal.is_empty() {
        parts.push(DestinationPart::Literal(literal));
    }

    parts
}

pub fn render_destination(template: &str, groups: &[String]) -> String {
    render_parts(&parse_destination_template(template), groups)
}

/// Substitutes captured values into a parsed destination template.
/// References outside `1..=groups.len()` are written back as they were typed.
pub fn render_parts(parts: &[DestinationPart], groups: &[String]) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            DestinationPart::Literal(s) => output.push_str(s),
            DestinationPart::Reference(digits) => match resolve_reference(digits, groups) {
                Some(value) => output.push_str(value),
                None => {
                    output.push('%');
                    output.push_str(digits);
                }
            },
        }
    }
    output
}

/// Byte-level counterpart of [`render_parts`], for names captured from file
/// names that are not valid UTF-8.
pub fn render_parts_bytes(parts: &[DestinationPart], groups: &[&[u8]]) -> Vec<u8> {
    let mut output = Vec::new();
    for part in parts {
        match part {
            DestinationPart::Literal(s) => output.extend_from_slice(s.as_bytes()),
            DestinationPart::Reference(digits) => match resolve_reference(digits, groups) {
                Some(value) => output.extend_from_slice(value),
                None => {
                    output.push(b'%');
                    output.extend_from_slice(digits.as_bytes());
                }
            },
        }
    }
    output
}

fn resolve_reference<'a, T>(digits: &str, groups: &'a [T]) -> Option<&'a T> {
    let index = digits.parse::<usize>().ok()?;
    groups.get(index.checked_sub(1)?)
}
