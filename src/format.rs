//! Markdown-to-terminal formatting.
//!
//! Not a full CommonMark parser. Handles the constructs that show up in chat
//! replies: headings, emphasis, inline code, fenced code blocks, lists, block
//! quotes, horizontal rules, and links. Works line by line, so it is safe to
//! call on a partially streamed reply (an unterminated fence simply renders
//! as code until more text arrives).

use colored::Colorize;
use unicode_width::UnicodeWidthChar;

/// Renders markdown `text` as styled terminal output.
pub fn render_markdown(text: &str, width: usize) -> String {
    let mut output = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            if in_code_block {
                in_code_block = false;
            } else {
                in_code_block = true;
                let lang = trimmed.trim_start_matches('`').trim();
                if !lang.is_empty() {
                    output.push_str(&format!("  {}\n", lang.dimmed().italic()));
                }
            }
            continue;
        }

        if in_code_block {
            output.push_str(&format!("  {}\n", line.yellow()));
            continue;
        }

        output.push_str(&render_block_line(line, width));
        output.push('\n');
    }

    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Styles a single non-code line according to its block-level marker.
fn render_block_line(line: &str, width: usize) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if is_rule(trimmed) {
        return "─".repeat(width.max(1)).dimmed().to_string();
    }

    if let Some((level, title)) = heading(trimmed) {
        let title = render_inline(title);
        return match level {
            1 => title.bold().underline().to_string(),
            2 => title.bold().to_string(),
            _ => title.bold().italic().to_string(),
        };
    }

    if let Some(rest) = trimmed.strip_prefix('>') {
        let body = render_inline(rest.trim_start());
        return format!("{}{} {}", indent, "▌".dimmed(), body.italic());
    }

    if let Some(rest) = bullet(trimmed) {
        return format!("{}{} {}", indent, "•".cyan().bold(), render_inline(rest));
    }

    if let Some((number, rest)) = numbered(trimmed) {
        return format!(
            "{}{} {}",
            indent,
            format!("{number}.").cyan().bold(),
            render_inline(rest)
        );
    }

    render_inline(line)
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3 && ['-', '*', '_'].iter().any(|&m| compact.chars().all(|c| c == m))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|title| (level, title.trim()))
}

fn bullet(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
}

fn numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(|body| (&line[..digits], body))
}

/// Handle `**bold**`, `*italic*`, `` `inline code` ``, and `[text](url)`
/// within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if i + 1 < len && chars[i] == '*' && chars[i + 1] == '*' {
            if let Some(end) = find_closing(&chars, i + 2, "**") {
                let bold_text: String = chars[i + 2..end].iter().collect();
                result.push_str(&bold_text.bold().to_string());
                i = end + 2;
                continue;
            }
        }

        if chars[i] == '*' || chars[i] == '_' {
            let marker = chars[i];
            let opens_word = chars.get(i + 1).is_some_and(|c| !c.is_whitespace());
            let after_word = i > 0 && chars[i - 1].is_alphanumeric();
            if opens_word && !after_word {
                if let Some(end) = find_closing_char(&chars, i + 1, marker) {
                    if end > i + 1 {
                        let text: String = chars[i + 1..end].iter().collect();
                        result.push_str(&text.italic().to_string());
                        i = end + 1;
                        continue;
                    }
                }
            }
        }

        if chars[i] == '`' {
            if let Some(end) = find_closing_char(&chars, i + 1, '`') {
                let code_text: String = chars[i + 1..end].iter().collect();
                result.push_str(&code_text.yellow().to_string());
                i = end + 1;
                continue;
            }
        }

        if chars[i] == '[' {
            if let Some((label, url, next)) = parse_link(&chars, i) {
                result.push_str(&format!(
                    "{} ({})",
                    label.blue().underline(),
                    url.dimmed()
                ));
                i = next;
                continue;
            }
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}

/// Parses `[label](url)` starting at `start`. Returns the index after `)`.
fn parse_link(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let close = find_closing_char(chars, start + 1, ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let end = find_closing_char(chars, close + 2, ')')?;
    let label: String = chars[start + 1..close].iter().collect();
    let url: String = chars[close + 2..end].iter().collect();
    Some((label, url, end + 1))
}

fn find_closing(chars: &[char], start: usize, pattern: &str) -> Option<usize> {
    let pat: Vec<char> = pattern.chars().collect();
    if chars.len() < pat.len() {
        return None;
    }
    (start..chars.len() - pat.len() + 1).find(|&i| chars[i..i + pat.len()] == pat[..])
}

fn find_closing_char(chars: &[char], start: usize, ch: char) -> Option<usize> {
    (start..chars.len()).find(|&i| chars[i] == ch)
}

/// Tab stops every this many columns.
const TAB_WIDTH: usize = 8;

/// Display width of one line of `text` in terminal columns.
///
/// ANSI escape sequences take no space, wide (CJK, emoji) characters take
/// two columns, and tabs advance to the next tab stop.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI sequence: ESC [ ... final byte in 0x40..=0x7E
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            continue;
        }
        if c == '\t' {
            width += TAB_WIDTH - width % TAB_WIDTH;
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// Number of terminal rows `text` occupies at `width` columns, with wrapping.
pub fn visual_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n')
        .map(|line| {
            let len = visible_width(line);
            if len == 0 {
                1
            } else {
                len.div_ceil(width)
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> String {
        colored::control::set_override(false);
        render_markdown(text, 10)
    }

    #[test]
    fn test_inline_markup_is_stripped() {
        assert_eq!(plain("a **bold** and `code` word"), "a bold and code word");
        assert_eq!(plain("some *italic* text"), "some italic text");
        assert_eq!(plain("snake_case_name stays"), "snake_case_name stays");
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(plain("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(plain("**not closed"), "**not closed");
    }

    #[test]
    fn test_blocks() {
        assert_eq!(plain("# Title"), "Title");
        assert_eq!(plain("- item"), "• item");
        assert_eq!(plain("  * nested"), "  • nested");
        assert_eq!(plain("3. third"), "3. third");
        assert_eq!(plain("> quoted"), "▌ quoted");
        assert_eq!(plain("---"), "─".repeat(10));
    }

    #[test]
    fn test_code_fence_shows_language() {
        let out = plain("```rust\nfn main() {}\n```\nafter");
        assert_eq!(out, "  rust\n  fn main() {}\nafter");
    }

    #[test]
    fn test_unterminated_fence_renders_as_code() {
        let out = plain("```\nlet x = **1**;");
        assert_eq!(out, "  let x = **1**;");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            plain("see [docs](https://example.com)"),
            "see docs (https://example.com)"
        );
    }

    #[test]
    fn test_visible_width_ignores_ansi() {
        assert_eq!(visible_width("\x1b[1mbold\x1b[0m"), 4);
        assert_eq!(visible_width("héllo"), 5);
    }

    #[test]
    fn test_visible_width_wide_chars_and_tabs() {
        assert_eq!(visible_width("你好"), 4);
        assert_eq!(visible_width("a\tb"), 9);
        assert_eq!(visible_width("\t"), 8);
        assert_eq!(visible_width("12345678\tx"), 17);
        assert_eq!(visible_width("\x1b[33m你\x1b[0m"), 2);
    }

    #[test]
    fn test_visual_rows_counts_wide_chars() {
        // 30 CJK characters are 60 columns: two rows at width 40.
        assert_eq!(visual_rows(&"你".repeat(30), 40), 2);
        assert_eq!(visual_rows(&"你".repeat(20), 40), 1);
        assert_eq!(visual_rows("\t\t\t\t\t", 40), 1);
        assert_eq!(visual_rows("\t\t\t\t\tx", 40), 2);
    }

    #[test]
    fn test_visual_rows_wraps() {
        assert_eq!(visual_rows("", 10), 1);
        assert_eq!(visual_rows("0123456789", 10), 1);
        assert_eq!(visual_rows("0123456789a", 10), 2);
        assert_eq!(visual_rows("a\n\nb", 10), 3);
    }
}
