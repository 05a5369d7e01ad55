//! Outfit table parsing.
//!
//! The recommendation service answers men's requests with a markdown table:
//!
//! ```text
//! | Outfit | Shirt/Top | Pants/Bottom | Shoes | Accessory | Occasion |
//! |--------|-----------|--------------|-------|-----------|----------|
//! | 1 | White dress shirt | Black dress pants | Black oxfords | Silver watch | Business |
//! ```
//!
//! Row 0 is the header, row 1 the separator, and every following row with at
//! least six non-empty cells becomes an [`OutfitRecord`]. Anything else is
//! rendered as plain text.

use serde::{Deserialize, Serialize};

/// Column separator for markdown tables.
const SEPARATOR: char = '|';

/// Minimum number of non-empty cells a data row needs.
const MIN_CELLS: usize = 6;

/// One structured outfit suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitRecord {
    /// Row label, usually the outfit number.
    pub label: String,
    /// Shirt or top.
    pub top: String,
    /// Pants or bottom.
    pub bottom: String,
    /// Shoes.
    pub footwear: String,
    /// Accessory.
    pub accessory: String,
    /// Occasion the outfit targets.
    pub occasion_tag: String,
}

impl OutfitRecord {
    fn from_cells(cells: &[&str]) -> Option<Self> {
        match cells {
            [label, top, bottom, footwear, accessory, occasion_tag, ..] => Some(Self {
                label: (*label).to_string(),
                top: (*top).to_string(),
                bottom: (*bottom).to_string(),
                footwear: (*footwear).to_string(),
                accessory: (*accessory).to_string(),
                occasion_tag: (*occasion_tag).to_string(),
            }),
            _ => None,
        }
    }
}

/// Parse a response into outfit records.
///
/// Returns `None` when the text is not a table or when no data row has
/// enough cells; callers render `None` as plain text.
pub fn parse_outfit_table(text: &str) -> Option<Vec<OutfitRecord>> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 3 {
        return None;
    }
    if !lines[0].contains(SEPARATOR) || !lines[1].contains(SEPARATOR) {
        return None;
    }

    let outfits: Vec<OutfitRecord> = lines[2..]
        .iter()
        .filter_map(|line| {
            let cells: Vec<&str> = line
                .split(SEPARATOR)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect();
            if cells.len() >= MIN_CELLS {
                OutfitRecord::from_cells(&cells)
            } else {
                None
            }
        })
        .collect();

    if outfits.is_empty() {
        None
    } else {
        Some(outfits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_row() {
        let text = "A|Top|Bottom|Shoes\n---|---|---|---\n1|Tee|Jeans|Sneakers|Belt|Casual";
        let outfits = parse_outfit_table(text).unwrap();
        assert_eq!(
            outfits,
            vec![OutfitRecord {
                label: "1".to_string(),
                top: "Tee".to_string(),
                bottom: "Jeans".to_string(),
                footwear: "Sneakers".to_string(),
                accessory: "Belt".to_string(),
                occasion_tag: "Casual".to_string(),
            }]
        );
    }

    #[test]
    fn too_few_lines_is_not_a_table() {
        assert!(parse_outfit_table("").is_none());
        assert!(parse_outfit_table("| a | b |\n|---|---|").is_none());
    }

    #[test]
    fn missing_separator_in_header_or_rule_is_not_a_table() {
        let no_header = "Outfits\n|---|\n|1|a|b|c|d|e|";
        let no_rule = "|h|\n-----\n|1|a|b|c|d|e|";
        assert!(parse_outfit_table(no_header).is_none());
        assert!(parse_outfit_table(no_rule).is_none());
    }

    #[test]
    fn plain_text_is_not_a_table() {
        let text = "Here are 5 outfits:\n\n• White tee + Jeans + Sneakers: Classic";
        assert!(parse_outfit_table(text).is_none());
    }

    #[test]
    fn malformed_rows_are_dropped() {
        let text = "\
| Outfit | Shirt/Top | Pants/Bottom | Shoes | Accessory | Occasion |
|--------|-----------|--------------|-------|-----------|----------|
| 1 | White dress shirt | Black dress pants | Black oxford shoes | Silver watch | Business meeting |
| 2 | Navy polo | Khaki chinos |
| 3 | Light blue button-down | Dark jeans | White sneakers | Casual watch | Weekend out |";
        let outfits = parse_outfit_table(text).unwrap();
        assert_eq!(outfits.len(), 2);
        assert_eq!(outfits[0].label, "1");
        assert_eq!(outfits[1].label, "3");
        assert_eq!(outfits[1].footwear, "White sneakers");
    }

    #[test]
    fn only_malformed_rows_is_not_a_table() {
        let text = "| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |";
        assert!(parse_outfit_table(text).is_none());
    }

    #[test]
    fn extra_cells_are_ignored() {
        let text = "|h|\n|-|\n| 1 | a | b | c | d | e | extra |";
        let outfits = parse_outfit_table(text).unwrap();
        assert_eq!(outfits[0].occasion_tag, "e");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let text = "\n\n|h|\n|-|\n|1|a|b|c|d|e|\n\n";
        assert_eq!(parse_outfit_table(text).map(|o| o.len()), Some(1));
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "|h|\n|-|\n|1|a|b|c|d|e|\n|2|f|g|h|i|j|";
        assert_eq!(parse_outfit_table(text), parse_outfit_table(text));
    }
}
