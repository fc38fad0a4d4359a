/*!
format.rs - terminal styling for human-facing output.

Used by `ConsoleCall` and the demo binary; JSON output never goes through
here.

Environment:
  NO_COLOR   disable ANSI colors
  NO_EMOJI   disable message icons
  COLUMNS    table width (clamped 40..=220, default 100)
*/

use std::borrow::Cow;

/* ---- Style Options ---- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width,
        }
    }

    /// No colors, no icons, default width.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width: 100,
        }
    }
}

/* ---- Color / Icons ---- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Heading,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Heading => "38;5;45",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "info" => "ℹ",
        _ => "",
    }
}

/* ---- Table ---- */

/// Left-aligned columns separated by two spaces, header underlined.
/// Cells are truncated with `…` once the row would exceed the terminal width;
/// the last column absorbs the overflow.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(cell));
        }
    }
    let fixed: usize = widths[..cols - 1].iter().sum::<usize>() + (cols - 1) * 2;
    if let Some(last) = widths.last_mut() {
        *last = (*last).min(style.term_width.saturating_sub(fixed).max(4));
    }

    let mut lines = vec![color(
        Role::Heading,
        render_row(headers.iter().copied(), &widths),
        style,
    )];
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(color(Role::Dim, rule, style));
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn render_row<'s>(cells: impl Iterator<Item = &'s str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, &w)| pad(&truncate_ellipsis(c, w), w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if display_width(s) <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/* ---- ANSI ---- */

/// Remove `ESC [ ... <letter>` sequences.
fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if n.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_table_layout() {
        let t = table(
            &["NAME", "ARGS"],
            &[
                vec!["greet".into(), "--who".into()],
                vec!["x".into(), "".into()],
            ],
            &StyleOptions::plain(),
        );
        assert_eq!(t, "NAME   ARGS\n-----  -----\ngreet  --who\nx");
    }

    #[test]
    fn last_column_truncated_to_width() {
        let style = StyleOptions {
            term_width: 12,
            ..StyleOptions::plain()
        };
        let t = table(&["A", "B"], &[vec!["a".into(), "abcdefghijkl".into()]], &style);
        assert!(t.lines().last().unwrap().ends_with('…'));
    }

    #[test]
    fn truncate() {
        assert_eq!(truncate_ellipsis("abcdef", 4), "abc…");
        assert_eq!(truncate_ellipsis("abc", 4), "abc");
    }

    #[test]
    fn strip_ansi_codes() {
        assert_eq!(strip_ansi("\x1b[31mRED\x1b[0m"), "RED");
        assert_eq!(color(Role::Error, "x", &StyleOptions::plain()), "x");
    }
}
