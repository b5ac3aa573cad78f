//! Error types for parsing and compilation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

pub use crate::parser::ast::Span;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                render_report(
                    source,
                    filename,
                    span,
                    message,
                    &format!("{}{}", message, expected_str),
                )
            }
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::parser::lexer::Token) -> String {
    use crate::parser::lexer::Token;
    match tok {
        Token::StartTag(name) => format!("start tag '<{}'", name),
        Token::EndTag(name) => format!("end tag '</{}'", name),
        Token::Name(name) => format!("attribute '{}'", name),
        Token::Equals => "'='".to_string(),
        Token::Value(value) => format!("value \"{}\"", value),
        Token::TagEnd => "'>'".to_string(),
        Token::EmptyTagEnd => "'/>'".to_string(),
        Token::Text(text) if text.trim().is_empty() => "whitespace".to_string(),
        Token::Text(text) => format!("text \"{}\"", text.trim()),
        Token::Error(raw) => format!("invalid markup '{}'", raw),
    }
}

/// Abort raised anywhere in a compilation pass.
///
/// Every variant is fatal: the pass stops and any partial output is discarded.
/// Nothing in the pipeline recovers from or rewrites these errors.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Element or attribute prefix with no `xmlns:` binding in scope
    #[error("unbound namespace prefix '{prefix}'")]
    UnboundPrefix { prefix: String, span: Span },

    /// Document element is not `<ui:UiBinder>`
    #[error("root element must be <UiBinder> in namespace {expected}, found <{found}>")]
    InvalidRoot {
        found: String,
        expected: String,
        span: Span,
    },

    /// `<ui:UiBinder>` must wrap exactly one widget element
    #[error("<UiBinder> must contain exactly one widget element")]
    MissingRootWidget { span: Span },

    /// Element was handed to the widget writer but is not a widget
    #[error("<{element}> is not a widget element")]
    NotAWidget { element: String, span: Span },

    /// Two fields share a name
    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String, span: Span },

    /// `ui:field` value is not usable as an identifier
    #[error("field name '{name}' is not a valid identifier")]
    InvalidFieldName { name: String, span: Span },

    /// `ui:field` value collides with the generated naming scheme
    #[error("field name '{name}' is reserved for generated identifiers")]
    ReservedFieldName { name: String, span: Span },

    /// Widget contains a child it cannot hold
    #[error("<{element}> is not allowed inside widget {widget}")]
    UnexpectedChild {
        element: String,
        widget: String,
        span: Span,
    },

    /// Widget mixes text with element children
    #[error("widget {widget} mixes text and element children")]
    MixedContent { widget: String, span: Span },

    /// DOM lookup requested with no open container
    #[error("no open DOM container while placing <{tag}>")]
    NoDomCursor { tag: String },

    /// Statement template references an argument that was not supplied
    #[error("statement template '{template}' references missing argument {index}")]
    TemplateArgument { template: String, index: usize },

    /// Statement template contains an unknown `%` directive
    #[error("malformed statement template '{template}'")]
    MalformedTemplate { template: String },
}

impl CompileError {
    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnboundPrefix { span, .. }
            | Self::InvalidRoot { span, .. }
            | Self::MissingRootWidget { span }
            | Self::NotAWidget { span, .. }
            | Self::DuplicateField { span, .. }
            | Self::InvalidFieldName { span, .. }
            | Self::ReservedFieldName { span, .. }
            | Self::UnexpectedChild { span, .. }
            | Self::MixedContent { span, .. } => Some(span),
            Self::NoDomCursor { .. }
            | Self::TemplateArgument { .. }
            | Self::MalformedTemplate { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = self.to_string();
        match self.span() {
            Some(span) => render_report(source, filename, span, &message, &message),
            None => format!("Error: {}", message),
        }
    }
}

fn render_report(source: &str, filename: &str, span: &Span, message: &str, label: &str) -> String {
    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("Error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_span() {
        let err = CompileError::DuplicateField {
            name: "ok".to_string(),
            span: 4..8,
        };
        assert_eq!(err.span(), Some(&(4..8)));
        assert!(CompileError::NoDomCursor {
            tag: "span".to_string()
        }
        .span()
        .is_none());
    }

    #[test]
    fn test_compile_error_format_includes_message() {
        let source = r#"<g:Label ui:field="1x"/>"#;
        let err = CompileError::InvalidFieldName {
            name: "1x".to_string(),
            span: 18..20,
        };
        let report = err.format(source, "Test.ui.xml");
        assert!(report.contains("not a valid identifier"));
    }

    #[test]
    fn test_format_without_span() {
        let err = CompileError::TemplateArgument {
            template: "%2$s".to_string(),
            index: 2,
        };
        assert_eq!(
            err.format("", "Test.ui.xml"),
            "Error: statement template '%2$s' references missing argument 2"
        );
    }
}
