//! Structural parser for HTML panels
//!
//! Walks a panel's content depth first, left to right, offering every element
//! to the interpreter pipe. What the pipe leaves alone is copied into the
//! panel's HTML; what it replaces is copied as the replacement.

use crate::error::CompileError;
use crate::parser::entities::{escape_attribute, escape_text};
use crate::tree::{ElementData, MarkupTree, NodeId, NodeKind};
use crate::writer::{ChildCursor, FieldName, HostWriter};

use super::{FieldInterpreter, Interpreter, InterpreterPipe, WidgetInterpreter};

/// HTML elements written without a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub struct HtmlPanelParser {
    field: FieldName,
    pipe: InterpreterPipe,
}

impl HtmlPanelParser {
    /// Parser for the panel bound to `field`
    pub fn new(field: FieldName) -> Self {
        let pipe = InterpreterPipe::new()
            .with(WidgetInterpreter::new(field.clone()))
            .with(FieldInterpreter);
        Self { field, pipe }
    }

    /// Produce the panel's HTML, emitting code for everything embedded in it
    pub fn parse(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        panel: NodeId,
    ) -> Result<String, CompileError> {
        tracing::debug!(panel = %self.field, "parsing html panel");
        writer.push_dom_cursor(ChildCursor::new(format!("{}.getElement()", self.field)));

        let mut html = String::new();
        let result = self.parse_children(writer, tree, panel, &mut html);
        writer.pop_dom_cursor();

        result.map(|()| html)
    }

    fn parse_children(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        parent: NodeId,
        html: &mut String,
    ) -> Result<(), CompileError> {
        for &child in tree.children(parent) {
            match tree.kind(child) {
                NodeKind::Text(text) => html.push_str(&escape_text(text)),
                NodeKind::Fragment(fragment) => html.push_str(fragment),
                NodeKind::Element(data) => self.parse_element(writer, tree, child, data, html)?,
            }
        }
        Ok(())
    }

    fn parse_element(
        &self,
        writer: &mut dyn HostWriter,
        tree: &MarkupTree,
        elem: NodeId,
        data: &ElementData,
        html: &mut String,
    ) -> Result<(), CompileError> {
        if let Some(fragment) = self.pipe.interpret(writer, tree, elem)? {
            html.push_str(&fragment);
            writer.record_substitution(elem, &fragment);
            return Ok(());
        }

        let name = data.qualified_name();
        let access = writer.dom_access_expression(&name, &data.local_name)?;

        html.push('<');
        html.push_str(&name);
        for attr in data.attributes.iter().filter(|a| !a.is_binder_directive()) {
            html.push_str(&format!(
                " {}=\"{}\"",
                attr.qualified_name(),
                escape_attribute(&attr.value)
            ));
        }
        html.push('>');

        writer.push_dom_cursor(ChildCursor::new(access));
        let result = self.parse_children(writer, tree, elem, html);
        writer.pop_dom_cursor();
        result?;

        let is_void = data.children.is_empty() && VOID_ELEMENTS.contains(&data.local_name.as_str());
        if !is_void {
            html.push_str(&format!("</{}>", name));
        }

        writer.current_dom_cursor()?.advance_child();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::testing::{tree, RecordingWriter};
    use pretty_assertions::assert_eq;

    fn panel(body: &str) -> MarkupTree {
        tree(&format!(
            r#"<g:HTMLPanel xmlns:ui="urn:ui:binder" xmlns:g="urn:import:app.ui">{}</g:HTMLPanel>"#,
            body
        ))
    }

    fn run(t: &MarkupTree) -> (String, RecordingWriter) {
        let mut writer = RecordingWriter::new();
        writer.cursors.clear();
        let html = HtmlPanelParser::new(FieldName::new("p"))
            .parse(&mut writer, t, t.root())
            .unwrap();
        (html, writer)
    }

    #[test]
    fn test_plain_html_is_copied() {
        let t = panel(r#"<div class="a &amp; b">Hi &lt;you&gt;<br/></div>"#);
        let (html, writer) = run(&t);
        assert_eq!(html, r#"<div class="a &amp; b">Hi &lt;you&gt;<br></div>"#);
        assert!(writer.statements.is_empty());
        assert!(writer.cursors.is_empty());
    }

    #[test]
    fn test_widgets_replaced_in_document_order() {
        let t = panel("<table><g:Grid/></table><ul><li>x</li><g:Item/></ul>");
        let (html, writer) = run(&t);

        assert_eq!(html, "<table><tbody></tbody></table><ul><li>x</li><li></li></ul>");
        assert_eq!(
            writer.statements,
            vec![
                "Element element1 = child(child(p.getElement(), 0, \"table\"), 0, \"tbody\");",
                "p.addAndReplaceElement(grid1, element1);",
                "Element element2 = child(child(p.getElement(), 1, \"ul\"), 1, \"li\");",
                "p.addAndReplaceElement(item2, element2);",
            ]
        );
        let fragments: Vec<&str> = writer.substitutions.iter().map(|(_, f)| f.as_str()).collect();
        assert_eq!(fragments, vec!["<tbody></tbody>", "<li></li>"]);
    }

    #[test]
    fn test_binder_attributes_stripped_and_fields_bound() {
        let t = panel(r#"<span ui:field="greeting" id="g">hello</span>"#);
        let (html, writer) = run(&t);
        assert_eq!(html, r#"<span id="g">hello</span>"#);
        assert_eq!(
            writer.statements,
            vec!["Element greeting = child(p.getElement(), 0, \"span\");"]
        );
    }

    #[test]
    fn test_text_does_not_take_a_slot() {
        let t = panel("text<em/>more<g:Label/>");
        let (_, writer) = run(&t);
        assert_eq!(
            writer.statements[0],
            "Element element1 = child(p.getElement(), 1, \"span\");"
        );
    }

    #[test]
    fn test_cursor_stack_restored_on_error() {
        let t = panel(r#"<p ui:field="x"/><p ui:field="x"/>"#);
        let mut writer = RecordingWriter::new();
        let result = HtmlPanelParser::new(FieldName::new("p")).parse(&mut writer, &t, t.root());
        assert!(matches!(result, Err(CompileError::DuplicateField { .. })));
        assert_eq!(writer.cursors.len(), 1);
    }
}
