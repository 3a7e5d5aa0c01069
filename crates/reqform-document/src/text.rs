//! Line-oriented text fields.
//!
//! String-list fields are edited in a textarea, one item per line. While the
//! user types every line is kept; when the field loses focus the lines are
//! trimmed and blank ones dropped.

use reqform_state::TextList;

/// Every line of `text`, as typed.
pub fn split_lines(text: &str) -> TextList {
    text.split('\n').collect()
}

/// The non-blank lines of `text`, trimmed.
///
/// ```
/// use reqform_document::text::lines_to_list;
///
/// let list = lines_to_list("  chairs \n\n tables\n");
/// assert_eq!(list.as_slice(), ["chairs", "tables"]);
/// ```
pub fn lines_to_list(text: &str) -> TextList {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Join a list back into textarea content.
pub fn list_to_text(list: &TextList) -> String {
    list.as_slice().join("\n")
}

/// Number of non-blank lines.
pub fn item_count(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Marker drawn in front of each line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulletStyle {
    #[default]
    Bullet,
    Dash,
    Arrow,
    Check,
    Star,
    Circle,
    Square,
    /// `1.`, `2.`, ...
    Number,
    None,
}

impl BulletStyle {
    /// Marker for the line at `index`.
    pub fn marker(self, index: usize) -> String {
        let glyph = match self {
            BulletStyle::Bullet => "•",
            BulletStyle::Dash => "—",
            BulletStyle::Arrow => "→",
            BulletStyle::Check => "✓",
            BulletStyle::Star => "★",
            BulletStyle::Circle => "○",
            BulletStyle::Square => "▪",
            BulletStyle::Number => return format!("{}.", index + 1),
            BulletStyle::None => "",
        };
        glyph.to_string()
    }
}

/// Render a list with markers, one line each.
pub fn render_bulleted(list: &TextList, style: BulletStyle) -> String {
    list.iter()
        .enumerate()
        .map(|(i, line)| match style.marker(i) {
            marker if marker.is_empty() => line.clone(),
            marker => format!("{marker} {line}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_blank_lines() {
        let list = split_lines("a\n\n b");
        assert_eq!(list.as_slice(), ["a", "", " b"]);
        assert_eq!(split_lines("").len(), 1);
    }

    #[test]
    fn test_lines_to_list_cleans() {
        assert!(lines_to_list("\n  \n").is_empty());
        assert_eq!(lines_to_list("one\r\ntwo").as_slice(), ["one", "two"]);
    }

    #[test]
    fn test_text_round_trip() {
        let list = TextList::from(vec!["Projector", "Sound system"]);
        let text = list_to_text(&list);
        assert_eq!(text, "Projector\nSound system");
        assert_eq!(lines_to_list(&text), list);
        assert_eq!(item_count("a\n \nb\n"), 2);
    }

    #[test]
    fn test_render_bulleted() {
        let list = TextList::from(vec!["first", "second"]);
        assert_eq!(render_bulleted(&list, BulletStyle::Number), "1. first\n2. second");
        assert_eq!(render_bulleted(&list, BulletStyle::Bullet), "• first\n• second");
        assert_eq!(render_bulleted(&list, BulletStyle::None), "first\nsecond");
    }
}
