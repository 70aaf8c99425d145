//! Terminal colorization for containment tree output
//!
//! Applies ANSI escape codes to tree lines using crossterm.

use crossterm::style::{Color, Stylize};
use std::str::FromStr;

use trellis::NodeKind;

/// Colorize a rendered containment tree
///
/// - Diagram header lines: Bold
/// - Container kinds: Cyan
/// - Kinds that require a parent: Yellow
/// - Other kinds: Green
/// - Element ids: Dark grey
/// - Everything else: Default (terminal color)
pub fn colorize_tree(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        result.push_str(&colorize_line(line));
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn colorize_line(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    if indent.is_empty() && body.contains(" diagram #") {
        return format!("{}", body.bold());
    }

    let mut words = body.splitn(2, ' ');
    let (first, rest) = match (words.next(), words.next()) {
        (Some(first), Some(rest)) => (first, rest),
        _ => return line.to_string(),
    };
    let kind = match NodeKind::from_str(first) {
        Ok(kind) => kind,
        Err(_) => return line.to_string(),
    };

    let color = kind_color(kind);
    let rest: Vec<String> = rest
        .split(' ')
        .map(|word| {
            if word.starts_with('#') {
                format!("{}", word.with(Color::DarkGrey))
            } else {
                word.to_string()
            }
        })
        .collect();
    format!("{}{} {}", indent, first.with(color), rest.join(" "))
}

fn kind_color(kind: NodeKind) -> Color {
    if kind.is_container() {
        Color::Cyan
    } else if kind.requires_parent() {
        Color::Yellow
    } else {
        Color::Green
    }
}
