//! Statement templates and string literals for generated code

use crate::error::CompileError;

/// Fill a statement template with arguments.
///
/// `%s` takes the next argument in order, `%N$s` takes the N-th (1-based),
/// and `%%` is a literal percent sign.
pub fn format_statement(template: &str, args: &[&str]) -> Result<String, CompileError> {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let index = match chars.next() {
            Some('%') => {
                out.push('%');
                continue;
            }
            Some('s') => {
                next_arg += 1;
                next_arg
            }
            Some(d) if d.is_ascii_digit() => {
                let mut digits = d.to_string();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let positional = matches!(chars.next(), Some('$'))
                    && matches!(chars.next(), Some('s'));
                let index = digits.parse::<usize>().ok().filter(|&i| i > 0);
                match (positional, index) {
                    (true, Some(index)) => index,
                    _ => return Err(malformed(template)),
                }
            }
            _ => return Err(malformed(template)),
        };

        let arg = args
            .get(index - 1)
            .ok_or_else(|| CompileError::TemplateArgument {
                template: template.to_string(),
                index,
            })?;
        out.push_str(arg);
    }

    Ok(out)
}

fn malformed(template: &str) -> CompileError {
    CompileError::MalformedTemplate {
        template: template.to_string(),
    }
}

/// Quote a value as a string literal in generated code
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_arguments() {
        let s = format_statement("%s %s = %s;", &["Element", "element1", "x()"]).unwrap();
        assert_eq!(s, "Element element1 = x();");
    }

    #[test]
    fn test_positional_arguments() {
        let s = format_statement(
            "%1$s.addAndReplaceElement(%2$s, %3$s);",
            &["panel", "button", "element2"],
        )
        .unwrap();
        assert_eq!(s, "panel.addAndReplaceElement(button, element2);");
    }

    #[test]
    fn test_positional_reuse_and_percent() {
        let s = format_statement("%2$s %1$s %2$s 100%%", &["a", "b"]).unwrap();
        assert_eq!(s, "b a b 100%");
    }

    #[test]
    fn test_missing_argument() {
        let err = format_statement("%1$s.add(%2$s);", &["panel"]).unwrap_err();
        assert!(matches!(err, CompileError::TemplateArgument { index: 2, .. }));
    }

    #[test]
    fn test_malformed_directive() {
        assert!(matches!(
            format_statement("%d", &["1"]),
            Err(CompileError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            format_statement("%0$s", &["1"]),
            Err(CompileError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            format_statement("trailing %", &[]),
            Err(CompileError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal(r#"<a href="x">"#), r#""<a href=\"x\">""#);
        assert_eq!(string_literal("a\\b\nc"), r#""a\\b\nc""#);
    }
}
