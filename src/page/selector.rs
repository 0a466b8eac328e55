//! The CSS selector subset the controllers query with.
//!
//! Supported: type (`a`), id (`#toast-msg`), class (`.item`), attribute
//! presence (`[data-toggle-status]`) and equality (`[data-page=next]`,
//! `[name="username"]`), compounds of those, and the descendant combinator.

use super::PageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

/// Descendant chain, outermost compound first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

/// What a compound needs to know about one element.
pub trait ElementView {
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, PageError> {
        let parts = input
            .split_whitespace()
            .map(|part| parse_compound(part).ok_or_else(|| PageError::Selector(input.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.is_empty() {
            return Err(PageError::Selector(input.to_string()));
        }
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[Compound] {
        &self.parts
    }

    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        // parse() rejects empty selectors
        &self.parts[self.parts.len() - 1]
    }

    /// Ancestor compounds, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Compound> {
        self.parts[..self.parts.len() - 1].iter().rev()
    }
}

impl Compound {
    pub fn matches(&self, el: &impl ElementView) -> bool {
        if self.tag.as_ref().is_some_and(|tag| !el.tag().eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self.id.as_ref().is_some_and(|id| el.attribute("id") != Some(id.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|a| match (&a.value, el.attribute(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(want), Some(have)) => want == have,
        })
    }
}

fn parse_compound(input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = input;

    let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
    if tag_end > 0 {
        compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(first) = rest.chars().next() {
        match first {
            '#' | '.' => {
                let body = &rest[1..];
                let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                if end == 0 {
                    return None;
                }
                let name = body[..end].to_string();
                if first == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
                rest = &body[end..];
            }
            '[' => {
                let close = rest.find(']')?;
                compound.attributes.push(parse_attribute(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attribute(body: &str) -> Option<AttributeMatch> {
    match body.split_once('=') {
        None if !body.is_empty() => Some(AttributeMatch { name: body.to_string(), value: None }),
        None => None,
        Some((name, value)) => {
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some(AttributeMatch {
                name: name.to_string(),
                value: Some(value.to_string()),
            })
        }
    }
}
