//! Rendering of `:name` placeholders into positional `$n` placeholders.

use crate::error::{BackendError, StorageResult};
use crate::query::value::{Params, SqlValue};

/// A statement ready for a positional-parameter backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    /// SQL with `$1..$n` placeholders.
    pub sql: String,
    /// Argument for each placeholder, in placeholder order.
    pub args: Vec<SqlValue>,
    /// Parameter name behind each placeholder, in placeholder order.
    pub names: Vec<String>,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `:name` in `template` with `$n` and collects the arguments.
///
/// `::` casts and quoted literals or identifiers are copied through untouched.
/// A name used more than once is bound to a single placeholder. Parameters
/// the template never mentions are ignored.
///
/// ```
/// use airq_persistence::db::render;
/// use airq_persistence::query::{Params, SqlValue};
///
/// let params = Params::from([("id".to_string(), SqlValue::Int(7))]);
/// let rendered = render("SELECT :id::int, ':id' WHERE id = :id", &params).unwrap();
/// assert_eq!(rendered.sql, "SELECT $1::int, ':id' WHERE id = $1");
/// assert_eq!(rendered.args, vec![SqlValue::Int(7)]);
/// ```
pub fn render(template: &str, params: &Params) -> StorageResult<RenderedQuery> {
    let mut sql = String::with_capacity(template.len());
    let mut args = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                sql.push(c);
                for inner in chars.by_ref() {
                    sql.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            ':' if chars.peek() == Some(&':') => {
                sql.push_str("::");
                chars.next();
            }
            ':' if chars.peek().copied().is_some_and(is_name_start) => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                let position = match names.iter().position(|n| *n == name) {
                    Some(index) => index + 1,
                    None => {
                        let value = params.get(&name).ok_or_else(|| BackendError::Render {
                            message: format!("no value supplied for parameter '{}'", name),
                        })?;
                        args.push(value.clone());
                        names.push(name);
                        names.len()
                    }
                };
                sql.push('$');
                sql.push_str(&position.to_string());
            }
            _ => sql.push(c),
        }
    }

    Ok(RenderedQuery { sql, args, names })
}
