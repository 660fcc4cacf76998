//! Simple CSS selectors.
//!
//! Supports compound selectors built from a type (`section`, `*`), an id
//! (`#intro`), classes (`.tab-start.loaded`) and attribute tests (`[data-id]`,
//! `[data-id="faq"]`), joined into comma-separated lists. Combinators are not
//! supported; descendant scoping is done by the query helpers instead.

use tabkit_types::error::{Result, TabsError};
use tabkit_types::event::NodeId;

use crate::dom::Document;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(src: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for part in src.split(',') {
            alternatives.push(parse_compound(part.trim(), src)?);
        }
        Ok(Self { alternatives })
    }

    /// Whether the element `id` matches any alternative.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(el) = doc.element(id) else {
            return false;
        };
        self.alternatives.iter().any(|c| {
            c.tag.as_deref().is_none_or(|t| el.tag.as_str() == t)
                && c.id.as_deref().is_none_or(|i| el.id() == Some(i))
                && c.classes.iter().all(|cls| el.has_class(cls))
                && c.attrs.iter().all(|a| match (&a.value, el.get_attribute(&a.name)) {
                    (None, Some(_)) => true,
                    (Some(want), Some(have)) => want == have,
                    (_, None) => false,
                })
        })
    }
}

fn parse_compound(part: &str, full: &str) -> Result<Compound> {
    let err = |msg: &str| TabsError::Selector(format!("{msg} in {full:?}"));
    if part.is_empty() {
        return Err(err("empty selector"));
    }

    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    if chars.peek() == Some(&'*') {
        chars.next();
    } else if chars.peek().is_some_and(|&c| is_ident_char(c)) {
        let mut tag = String::new();
        while let Some(&c) = chars.peek().filter(|&&c| is_ident_char(c)) {
            tag.push(c.to_ascii_lowercase());
            chars.next();
        }
        compound.tag = Some(tag);
    }

    while let Some(c) = chars.next() {
        match c {
            '#' | '.' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek().filter(|&&n| is_ident_char(n)) {
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(err("missing name after '#' or '.'"));
                }
                if c == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
            },
            '[' => {
                let body: String = chars.by_ref().take_while(|&b| b != ']').collect();
                if !part.contains(']') {
                    return Err(err("unterminated attribute selector"));
                }
                let test = match body.split_once('=') {
                    Some((name, value)) => AttrTest {
                        name: name.trim().to_string(),
                        value: Some(value.trim().trim_matches(|q| q == '"' || q == '\'').to_string()),
                    },
                    None => AttrTest {
                        name: body.trim().to_string(),
                        value: None,
                    },
                };
                if test.name.is_empty() {
                    return Err(err("empty attribute name"));
                }
                compound.attrs.push(test);
            },
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err(err("combinators are not supported"));
            },
            other => return Err(err(&format!("unexpected character {other:?}"))),
        }
    }
    Ok(compound)
}
