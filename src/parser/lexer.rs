//! Lexer for binder markup using logos
//!
//! Markup needs two lexing modes: between tags everything up to the next `<`
//! is text, while inside a tag whitespace separates names, `=` and quoted
//! values. Each mode is its own logos token type and the driver in [`lex`]
//! morphs between them.

use logos::{Lexer, Logos};

use super::ast::Span;
use super::entities::decode_entities;

/// Unified token stream consumed by the grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `<name`
    StartTag(String),
    /// `</name`
    EndTag(String),
    /// Attribute name inside a tag
    Name(String),
    /// `=` inside a tag
    Equals,
    /// Quoted attribute value, entity-decoded
    Value(String),
    /// `>`
    TagEnd,
    /// `/>`
    EmptyTagEnd,
    /// Character data between tags, entity-decoded
    Text(String),
    /// Input neither mode recognizes
    Error(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartTag(name) => write!(f, "<{}", name),
            Token::EndTag(name) => write!(f, "</{}", name),
            Token::Name(name) => write!(f, "{}", name),
            Token::Equals => write!(f, "="),
            Token::Value(value) => write!(f, "\"{}\"", value),
            Token::TagEnd => write!(f, ">"),
            Token::EmptyTagEnd => write!(f, "/>"),
            Token::Text(text) => write!(f, "{}", text),
            Token::Error(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum ContentToken {
    #[regex(r"<[A-Za-z_][A-Za-z0-9_:.\-]*", |lex| lex.slice()[1..].to_string())]
    StartTag(String),

    #[regex(r"</[A-Za-z_][A-Za-z0-9_:.\-]*", |lex| lex.slice()[2..].to_string())]
    EndTag(String),

    #[regex(r"[^<]+", |lex| decode_entities(lex.slice()).ok())]
    Text(String),

    #[token("<!--", |lex| skip_past(lex, "-->"))]
    Comment,

    #[token("<?", |lex| skip_past(lex, "?>"))]
    Declaration,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum TagToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_:.\-]*", |lex| lex.slice().to_string())]
    Name(String),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'[^']*'"#, |lex| unquote(lex.slice()))]
    Value(String),

    #[token(">")]
    Close,

    #[token("/>")]
    SelfClose,
}

/// Consume input up to and including `terminator`; fails when unterminated
fn skip_past(lex: &mut Lexer<ContentToken>, terminator: &str) -> bool {
    match lex.remainder().find(terminator) {
        Some(end) => {
            lex.bump(end + terminator.len());
            true
        }
        None => false,
    }
}

/// Strip the quotes and decode; `None` turns the value into an error token
fn unquote(quoted: &str) -> Option<String> {
    decode_entities(&quoted[1..quoted.len() - 1]).ok()
}

/// Lex markup into tokens with spans
pub fn lex(input: &str) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut content = ContentToken::lexer(input);

    while let Some(result) = content.next() {
        let span = content.span();
        let enters_tag = match result {
            Ok(ContentToken::StartTag(name)) => {
                tokens.push((Token::StartTag(name), span));
                true
            }
            Ok(ContentToken::EndTag(name)) => {
                tokens.push((Token::EndTag(name), span));
                true
            }
            Ok(ContentToken::Text(text)) => {
                tokens.push((Token::Text(text), span));
                false
            }
            Ok(ContentToken::Comment) | Ok(ContentToken::Declaration) => false,
            Err(()) => {
                tokens.push((Token::Error(content.slice().to_string()), span));
                false
            }
        };

        if enters_tag {
            let mut tag = content.morph::<TagToken>();
            while let Some(result) = tag.next() {
                let span = tag.span();
                match result {
                    Ok(TagToken::Name(name)) => tokens.push((Token::Name(name), span)),
                    Ok(TagToken::Equals) => tokens.push((Token::Equals, span)),
                    Ok(TagToken::Value(value)) => tokens.push((Token::Value(value), span)),
                    Ok(TagToken::Close) => {
                        tokens.push((Token::TagEnd, span));
                        break;
                    }
                    Ok(TagToken::SelfClose) => {
                        tokens.push((Token::EmptyTagEnd, span));
                        break;
                    }
                    Err(()) => tokens.push((Token::Error(tag.slice().to_string()), span)),
                }
            }
            content = tag.morph();
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(
            kinds("<br/>"),
            vec![Token::StartTag("br".to_string()), Token::EmptyTagEnd]
        );
    }

    #[test]
    fn test_prefixed_element_with_attributes() {
        assert_eq!(
            kinds(r#"<g:Button ui:field="ok" text='Go'>"#),
            vec![
                Token::StartTag("g:Button".to_string()),
                Token::Name("ui:field".to_string()),
                Token::Equals,
                Token::Value("ok".to_string()),
                Token::Name("text".to_string()),
                Token::Equals,
                Token::Value("Go".to_string()),
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_text_is_not_split_on_equals() {
        assert_eq!(
            kinds("<p>a = b</p>"),
            vec![
                Token::StartTag("p".to_string()),
                Token::TagEnd,
                Token::Text("a = b".to_string()),
                Token::EndTag("p".to_string()),
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            kinds(r#"<a title="&lt;x&gt;">&amp;</a>"#),
            vec![
                Token::StartTag("a".to_string()),
                Token::Name("title".to_string()),
                Token::Equals,
                Token::Value("<x>".to_string()),
                Token::TagEnd,
                Token::Text("&".to_string()),
                Token::EndTag("a".to_string()),
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_comments_and_declarations_skipped() {
        assert_eq!(
            kinds("<?xml version=\"1.0\"?><!-- note --><div/>"),
            vec![Token::StartTag("div".to_string()), Token::EmptyTagEnd]
        );
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = "<div>hi</div>";
        let tokens = lex(source);
        let (_, span) = &tokens[2];
        assert_eq!(&source[span.clone()], "hi");
    }

    #[test]
    fn test_undefined_entity_is_error() {
        let tokens = kinds("<p>&copy; 2024</p>");
        assert_eq!(tokens[2], Token::Error("&copy; 2024".to_string()));

        let tokens = kinds(r#"<p title="&bogus;"/>"#);
        assert_eq!(tokens[2], Token::Error(r#""&bogus;""#.to_string()));
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let tokens = kinds("<!-- never closed");
        assert!(matches!(tokens.first(), Some(Token::Error(_))));
    }
}
