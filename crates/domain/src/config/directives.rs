//! Tokenizer for the `rqlite { ... }` directive block.

use super::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    OpenBlock,
    CloseBlock,
}

/// One logical line of the block: its tokens and the 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    pub line: usize,
    pub tokens: Vec<Token>,
}

pub fn tokenize(input: &str) -> Result<Vec<DirectiveLine>, ConfigError> {
    let mut lines = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = Vec::new();
        let mut chars = raw.chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                '#' => break,
                c if c.is_whitespace() => {
                    chars.next();
                }
                '{' => {
                    chars.next();
                    tokens.push(Token::OpenBlock);
                }
                '}' => {
                    chars.next();
                    tokens.push(Token::CloseBlock);
                }
                '"' => {
                    chars.next();
                    let mut word = String::new();
                    let mut closed = false;
                    while let Some(c) = chars.next() {
                        match c {
                            '"' => {
                                closed = true;
                                break;
                            }
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    word.push(escaped);
                                }
                            }
                            c => word.push(c),
                        }
                    }
                    if !closed {
                        return Err(ConfigError::Directive {
                            line: line_no,
                            message: "unterminated quoted string".to_string(),
                        });
                    }
                    tokens.push(Token::Word(word));
                }
                _ => {
                    let mut word = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_whitespace() || c == '{' || c == '}' || c == '#' {
                            break;
                        }
                        word.push(c);
                        chars.next();
                    }
                    tokens.push(Token::Word(word));
                }
            }
        }

        if !tokens.is_empty() {
            lines.push(DirectiveLine {
                line: line_no,
                tokens,
            });
        }
    }

    Ok(lines)
}

/// Expands `$VAR` and `${VAR}`; unset variables become empty.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    out.push_str(&lookup(&name).unwrap_or_default());
                } else {
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            Some(&c) if c == '_' || c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '_' || c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&lookup(&name).unwrap_or_default());
            }
            _ => out.push('$'),
        }
    }

    out
}
