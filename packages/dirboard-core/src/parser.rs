/// Card file parser.
///
/// Handles the card format:
///   tags: a, b          (optional metadata before the heading)
///   # Card Title        (first level-1 heading, optional)
///   body text ...
///   tags: c             (tags lines anywhere, never part of the body)
///
/// Total over any input: there are no error conditions.
use regex::Regex;
use std::sync::OnceLock;

/// Fields extracted from a card file's text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCard {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

fn re_tags_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Keyword is case-insensitive, values are kept verbatim.
    RE.get_or_init(|| Regex::new(r"^(?i:tags):(.*)$").unwrap())
}

/// Strip a trailing `.md` extension (any case) from a file name.
pub fn strip_md_extension(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 3 && file_name.is_char_boundary(len - 3) && file_name[len - 3..].eq_ignore_ascii_case(".md") {
        &file_name[..len - 3]
    } else {
        file_name
    }
}

/// Whether a file name carries the card extension.
pub fn is_card_file_name(file_name: &str) -> bool {
    strip_md_extension(file_name).len() != file_name.len()
}

/// Extract the tag values of a `tags:` line, or `None` if the line is not one.
fn tags_of_line(line: &str) -> Option<impl Iterator<Item = String> + '_> {
    let caps = re_tags_line().captures(line.trim())?;
    let rest = caps.get(1)?.as_str();
    Some(
        rest.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    )
}

/// Title text of a level-1 heading line, or `None` if the line is not one.
fn heading_of_line(line: &str) -> Option<&str> {
    line.trim().strip_prefix("# ").map(str::trim)
}

/// Parse card text. `fallback_name` is the file name, used (minus `.md`) when
/// the file has no usable level-1 heading.
pub fn parse_card(content: &str, fallback_name: &str) -> ParsedCard {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = content.split('\n').collect();
    let fallback = strip_md_extension(fallback_name);

    let mut title = fallback.to_string();
    let mut tags = Vec::new();
    let mut body_start = 0;

    // Only the first heading counts; later `# ...` lines are plain body text.
    if let Some((idx, heading)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| heading_of_line(line).map(|h| (i, h)))
    {
        if !heading.is_empty() {
            title = heading.to_string();
        }
        body_start = idx + 1;

        for line in &lines[..idx] {
            if let Some(found) = tags_of_line(line) {
                tags.extend(found);
            }
        }
    }

    let mut body_lines = Vec::new();
    for line in &lines[body_start..] {
        match tags_of_line(line) {
            Some(found) => tags.extend(found),
            None => body_lines.push(*line),
        }
    }

    ParsedCard {
        title,
        body: body_lines.join("\n").trim().to_string(),
        tags,
    }
}
