//! JSON Tree
//!
//! Fully expanded, root-hidden rendering of a JSON value as indented
//! key/value lines.

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use serde_json::Value;

use crate::tui::theme::Theme;

/// Render `value` as tree lines, each prefixed with `indent` spaces
pub fn json_tree_lines(value: &Value, theme: &Theme, indent: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) if map.is_empty() => {
            lines.push(Line::from(Span::styled(
                format!("{}{{}}", pad(indent)),
                theme.muted(),
            )));
        }
        Value::Array(items) if items.is_empty() => {
            lines.push(Line::from(Span::styled(
                format!("{}[]", pad(indent)),
                theme.muted(),
            )));
        }
        Value::Object(map) => {
            for (key, child) in map {
                push_node(&mut lines, key_span(key, theme), child, theme, indent);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let label = Span::styled(format!("{}", i), Style::default().fg(theme.purple));
                push_node(&mut lines, label, child, theme, indent);
            }
        }
        scalar => lines.push(Line::from(vec![
            Span::raw(pad(indent)),
            scalar_span(scalar, theme),
        ])),
    }
    lines
}

fn push_node(
    lines: &mut Vec<Line<'static>>,
    label: Span<'static>,
    child: &Value,
    theme: &Theme,
    indent: usize,
) {
    let colon = Span::styled(":", theme.muted());
    if is_container(child) && !is_empty_container(child) {
        let summary = match child {
            Value::Array(items) => format!(" [{}]", items.len()),
            Value::Object(map) => format!(" {{{}}}", map.len()),
            _ => String::new(),
        };
        lines.push(Line::from(vec![
            Span::raw(pad(indent)),
            label,
            colon,
            Span::styled(summary, theme.muted()),
        ]));
        lines.extend(json_tree_lines(child, theme, indent + 2));
    } else {
        lines.push(Line::from(vec![
            Span::raw(pad(indent)),
            label,
            colon,
            Span::raw(" "),
            scalar_span(child, theme),
        ]));
    }
}

fn key_span(key: &str, theme: &Theme) -> Span<'static> {
    Span::styled(key.to_string(), Style::default().fg(theme.blue))
}

fn scalar_span(value: &Value, theme: &Theme) -> Span<'static> {
    match value {
        Value::String(s) => Span::styled(format!("\"{}\"", s), Style::default().fg(theme.green)),
        Value::Number(n) => Span::styled(n.to_string(), Style::default().fg(theme.yellow)),
        Value::Bool(b) => Span::styled(b.to_string(), Style::default().fg(theme.cyan)),
        Value::Null => Span::styled("null", theme.muted()),
        Value::Array(_) => Span::styled("[]", theme.muted()),
        Value::Object(_) => Span::styled("{}", theme.muted()),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}
