//! Syntax tree produced by the markup grammar
//!
//! This is the raw shape of the source: qualified names are split but not yet
//! resolved against namespace declarations. [`crate::tree::MarkupTree`] is
//! built from it.

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A possibly prefixed name such as `ui:field` or `div`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(prefix: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.into(),
        }
    }

    /// Split a raw name at its first colon
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self::new(Some(prefix), local),
            None => Self::new(None, raw),
        }
    }

    /// True for `xmlns` and `xmlns:*` declarations
    pub fn is_namespace_declaration(&self) -> bool {
        match &self.prefix {
            Some(prefix) => prefix == "xmlns",
            None => self.local == "xmlns",
        }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// `name="value"` inside a start tag
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<QName>,
    pub value: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Spanned<QName>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Spanned<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// Root AST node - a complete markup document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Spanned<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_parse() {
        assert_eq!(QName::parse("ui:field"), QName::new(Some("ui"), "field"));
        assert_eq!(QName::parse("div"), QName::new(None, "div"));
        assert_eq!(QName::parse("a:b:c").local, "b:c");
    }

    #[test]
    fn test_namespace_declarations() {
        assert!(QName::parse("xmlns").is_namespace_declaration());
        assert!(QName::parse("xmlns:g").is_namespace_declaration());
        assert!(!QName::parse("g:xmlns").is_namespace_declaration());
    }

    #[test]
    fn test_display() {
        assert_eq!(QName::parse("g:Button").to_string(), "g:Button");
    }
}
