//! Widget Binder - compiles declarative UI templates into construction code
//!
//! A template is XML markup whose `urn:import:` elements denote widgets and
//! whose plain elements are host HTML. Compilation binds every widget to a
//! field, emits the statements that build and attach it, and rewrites HTML
//! panels so each embedded widget is stood in for by a placeholder element.
//!
//! # Example
//!
//! ```rust
//! use widget_binder::compile;
//!
//! let binder = compile(r#"
//!     <ui:UiBinder xmlns:ui="urn:ui:binder" xmlns:g="urn:import:app.ui">
//!       <g:HTMLPanel><ul><g:Button text="Go"/></ul></g:HTMLPanel>
//!     </ui:UiBinder>
//! "#).unwrap();
//!
//! let code = binder.render();
//! assert!(code.contains("addAndReplaceElement(f_Button_2, element3)"));
//! assert!(code.contains(r#"new app.ui.HTMLPanel("<ul><li></li></ul>")"#));
//! ```

pub mod config;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod policy;
pub mod tree;
pub mod writer;

pub use config::{BinderConfig, ConfigError};
pub use error::{CompileError, ParseError};
pub use interpreter::{
    FieldInterpreter, HtmlPanelParser, Interpreter, InterpreterPipe, WidgetInterpreter,
};
pub use parser::{parse, Document};
pub use policy::PlaceholderPolicy;
pub use tree::{MarkupTree, NodeId};
pub use writer::{BinderWriter, CompiledBinder, HostWriter};

use thiserror::Error;

/// Errors that can occur while compiling a template
#[derive(Debug, Error)]
pub enum BinderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error during compilation
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
}

impl From<Vec<ParseError>> for BinderError {
    fn from(errors: Vec<ParseError>) -> Self {
        BinderError::Parse(errors)
    }
}

impl BinderError {
    /// Format every contained error with source context
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            BinderError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            BinderError::Compile(err) => err.format(source, filename),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse markup into a namespace-resolved tree
pub fn parse_tree(source: &str) -> Result<MarkupTree, BinderError> {
    let doc = parse(source)?;
    Ok(MarkupTree::from_document(&doc)?)
}

/// Compile a template with the default configuration
pub fn compile(source: &str) -> Result<CompiledBinder, BinderError> {
    compile_with_config(source, &BinderConfig::default())
}

/// Compile a template with a custom configuration
///
/// # Example
///
/// ```rust
/// use widget_binder::{compile_with_config, BinderConfig};
///
/// let config = BinderConfig::new().with_host_element_type("dom.Element");
/// let binder = compile_with_config(r#"
///     <ui:UiBinder xmlns:ui="urn:ui:binder" xmlns:g="urn:import:app.ui">
///       <g:HTMLPanel><g:Label/></g:HTMLPanel>
///     </ui:UiBinder>
/// "#, &config).unwrap();
///
/// assert!(binder.render().contains("dom.Element element3 = "));
/// ```
pub fn compile_with_config(
    source: &str,
    config: &BinderConfig,
) -> Result<CompiledBinder, BinderError> {
    let mut tree = parse_tree(source)?;

    let mut writer = BinderWriter::new(config.clone());
    let root_field = writer.parse_document(&tree)?;
    let mut binder = writer.finish(root_field);

    binder.apply_substitutions(&mut tree);
    binder.markup = tree.to_markup(tree.root());

    Ok(binder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = r#"<ui:UiBinder xmlns:ui="urn:ui:binder" xmlns:g="urn:import:app.ui">"#;

    fn template(body: &str) -> String {
        format!("{}{}</ui:UiBinder>", HEAD, body)
    }

    #[test]
    fn test_compile_simple_widget() {
        let binder = compile(&template(r#"<g:Label text="Hi"/>"#)).unwrap();
        assert_eq!(binder.root_field.as_str(), "f_Label_1");
        assert_eq!(binder.init_statements, vec!["f_Label_1.setText(\"Hi\");"]);
    }

    #[test]
    fn test_compile_panel_rewrites_markup() {
        let binder = compile(&template("<g:HTMLPanel><div><g:Button/></div></g:HTMLPanel>")).unwrap();
        assert_eq!(binder.substitutions.len(), 1);
        assert_eq!(binder.substitutions[0].fragment, "<span></span>");
        assert!(binder.markup.contains("<div><span></span></div>"));
        assert!(!binder.markup.contains("g:Button"));
    }

    #[test]
    fn test_parse_error() {
        let result = compile("<ui:UiBinder>");
        assert!(matches!(result, Err(BinderError::Parse(_))));
    }

    #[test]
    fn test_compile_error() {
        let result = compile(&template("<x:Label/>"));
        assert!(matches!(
            result,
            Err(BinderError::Compile(CompileError::UnboundPrefix { .. }))
        ));
    }

    #[test]
    fn test_error_format_mentions_message() {
        let source = template(r#"<g:Label ui:field="a"/><g:Label/>"#);
        let err = compile(&source).unwrap_err();
        let report = err.format(&source, "view.ui.xml");
        assert!(report.contains("exactly one widget"));
    }
}
