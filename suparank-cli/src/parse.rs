/// Parsing of user input: interactive answers and item lists.
use suparank_core::Choice;

/// One line typed during an interactive ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Pick(Choice),
    ViewRankings,
    Quit,
    Unknown,
}

/// Map an answer line to an action.
///
/// Accepts the letters shown on screen plus a few aliases: `1`/`left` for A,
/// `2`/`right` for B, `v` to view the current rankings, `q`/`exit` to stop.
pub fn parse_answer(line: &str) -> Answer {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "1" | "left" | "l" => Answer::Pick(Choice::A),
        "b" | "2" | "right" | "r" => Answer::Pick(Choice::B),
        "v" | "view" => Answer::ViewRankings,
        "q" | "quit" | "exit" => Answer::Quit,
        _ => Answer::Unknown,
    }
}

/// An item to import: title plus optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedItem {
    pub title: String,
    pub description: String,
}

/// Parse a string as either a JSON array or plain text (one item per line).
///
/// JSON entries may be strings (title only) or objects with `title` and an
/// optional `description`. Plain-text lines may separate title and
/// description with a tab.
pub fn parse_items_from_str(content: &str) -> Result<Vec<ImportedItem>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let entries: Vec<serde_json::Value> = serde_json::from_str(trimmed)
            .map_err(|e| format!("File looks like JSON but failed to parse: {e}"))?;
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = match entry {
                serde_json::Value::String(title) => ImportedItem {
                    title,
                    description: String::new(),
                },
                serde_json::Value::Object(fields) => {
                    let text = |key: &str| {
                        fields.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
                    };
                    ImportedItem {
                        title: text("title"),
                        description: text("description"),
                    }
                }
                other => return Err(format!("Unsupported item entry: {other}")),
            };
            if !item.title.trim().is_empty() {
                items.push(item);
            }
        }
        Ok(items)
    } else {
        Ok(trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| match l.split_once('\t') {
                Some((title, description)) => ImportedItem {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                },
                None => ImportedItem {
                    title: l.to_string(),
                    description: String::new(),
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[ImportedItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_parse_answer_letters_and_aliases() {
        assert_eq!(parse_answer("a"), Answer::Pick(Choice::A));
        assert_eq!(parse_answer(" A \n"), Answer::Pick(Choice::A));
        assert_eq!(parse_answer("left"), Answer::Pick(Choice::A));
        assert_eq!(parse_answer("2"), Answer::Pick(Choice::B));
        assert_eq!(parse_answer("Right"), Answer::Pick(Choice::B));
        assert_eq!(parse_answer("v"), Answer::ViewRankings);
        assert_eq!(parse_answer("q"), Answer::Quit);
        assert_eq!(parse_answer("c"), Answer::Unknown);
        assert_eq!(parse_answer(""), Answer::Unknown);
    }

    #[test]
    fn test_parse_plain_lines() {
        let items = parse_items_from_str("\n  Pay rent \n\nCall mom\tSunday evening\n").unwrap();
        assert_eq!(titles(&items), vec!["Pay rent", "Call mom"]);
        assert_eq!(items[1].description, "Sunday evening");
    }

    #[test]
    fn test_parse_json_strings_and_objects() {
        let items = parse_items_from_str(
            r#"["Pay rent", "", {"title": "Call mom", "description": "Sunday"}, {"description": "no title"}]"#,
        )
        .unwrap();
        assert_eq!(titles(&items), vec!["Pay rent", "Call mom"]);
        assert_eq!(items[1].description, "Sunday");
    }

    #[test]
    fn test_parse_bad_json() {
        assert!(parse_items_from_str("[\"unterminated").is_err());
        assert!(parse_items_from_str("[1, 2]").is_err());
    }
}
