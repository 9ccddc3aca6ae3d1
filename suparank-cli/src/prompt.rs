/// Comparison prompt shown during interactive ranking.
use suparank_core::Item;

/// Render the question for one pair.
///
/// `done` is the number of decisions made so far, `most` the worst-case
/// total for this many items.
pub fn build_prompt(item_a: &Item, item_b: &Item, done: usize, most: usize) -> String {
    format!(
        "\nComparison {current} (at most {most})\n\
         Which entry is more important?\n\n\
         A: {title_a}\n{desc_a}\n\
         B: {title_b}\n{desc_b}\n\
         [a] A is more important   [b] B is more important   [v] view rankings   [q] quit\n",
        current = done + 1,
        title_a = item_a.title,
        desc_a = indent(&item_a.description),
        title_b = item_b.title,
        desc_b = indent(&item_b.description),
    )
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("   {line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str) -> Item {
        Item {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_build_prompt_contains_all_parts() {
        let prompt = build_prompt(&item("Taxes", "File by April"), &item("Gym", ""), 2, 5);
        assert!(prompt.contains("Comparison 3 (at most 5)"));
        assert!(prompt.contains("Which entry is more important?"));
        assert!(prompt.contains("A: Taxes\n   File by April\n"));
        assert!(prompt.contains("B: Gym\n"));
        assert!(prompt.contains("[q] quit"));
    }

    #[test]
    fn test_indent_multiline_description() {
        assert_eq!(indent("one\ntwo"), "   one\n   two\n");
        assert_eq!(indent(""), "");
    }
}
