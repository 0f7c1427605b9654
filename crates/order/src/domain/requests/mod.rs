pub mod order;

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens nested validator output into `path: message` strings, e.g.
/// `products[0].qty: qty must be greater than zero`.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| match error.code.as_ref() {
                            "length" => "Invalid length".to_string(),
                            "range" => "Value out of range".to_string(),
                            "custom" => "Custom validation failed".to_string(),
                            _ => format!("Invalid {field}"),
                        });
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
