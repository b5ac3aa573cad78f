//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse markup source into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input)
        .into_iter()
        .map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Children and optional closing tag name of an element
type ElementBody = (Vec<Spanned<Node>>, Option<Spanned<QName>>);

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let attribute_name = select! {
        Token::Name(s) => QName::parse(&s),
    }
    .map_with(|name, e| Spanned::new(name, span_range(&e.span())));

    let attribute_value = select! {
        Token::Value(s) => s,
    }
    .map_with(|value, e| Spanned::new(value, span_range(&e.span())));

    let attribute = attribute_name
        .then_ignore(just(Token::Equals))
        .then(attribute_value)
        .map(|(name, value)| Attribute { name, value });

    let start_tag = select! {
        Token::StartTag(s) => QName::parse(&s),
    }
    .map_with(|name, e| Spanned::new(name, span_range(&e.span())));

    let end_tag = select! {
        Token::EndTag(s) => QName::parse(&s),
    }
    .map_with(|name, e| Spanned::new(name, span_range(&e.span())));

    let text = select! {
        Token::Text(s) => s,
    };

    // Whitespace allowed around the document element
    let blank = select! {
        Token::Text(s) if s.trim().is_empty() => (),
    };

    let element = recursive(|element| {
        let content = choice((element.map(Node::Element), text.map(Node::Text)))
            .map_with(|node, e| Spanned::new(node, span_range(&e.span())));

        let empty_body = just(Token::EmptyTagEnd).to::<ElementBody>((Vec::new(), None));

        let full_body = just(Token::TagEnd)
            .ignore_then(content.repeated().collect::<Vec<_>>())
            .then(end_tag.then_ignore(just(Token::TagEnd)))
            .map(|(children, end)| (children, Some(end)));

        start_tag
            .then(attribute.repeated().collect::<Vec<_>>())
            .then(choice((empty_body, full_body)))
            .try_map(|((name, attributes), (children, end)), span| {
                if let Some(end) = end {
                    if end.node != name.node {
                        return Err(Rich::custom(
                            span,
                            format!(
                                "closing tag </{}> does not match <{}>",
                                end.node, name.node
                            ),
                        ));
                    }
                }
                Ok(Element {
                    name,
                    attributes,
                    children,
                })
            })
            .boxed()
    });

    blank
        .clone()
        .repeated()
        .ignore_then(element.map_with(|el, e| Spanned::new(el, span_range(&e.span()))))
        .then_ignore(blank.repeated())
        .then_ignore(end())
        .map(|root| Document { root })
}
