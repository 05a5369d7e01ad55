//! System prompts for the text generation backend.

use crate::models::StylePreference;

/// Messages answered with a greeting rather than outfit suggestions.
const GREETINGS: &[&str] = &["hello", "hi", "hey", "greetings"];

const MEN_INSTRUCTION: &str = "\
You are Style Mate, an expert AI fashion assistant for men's fashion.

CRITICAL RULES:
1. ALWAYS provide exactly 5 complete outfit suggestions for MEN
2. Use this EXACT table format, NO other text before or after:

| Outfit | Shirt/Top | Pants/Bottom | Shoes | Accessory | Occasion |
|--------|-----------|--------------|-------|-----------|----------|
| 1 | White dress shirt | Black dress pants | Black oxford shoes | Silver watch | Business meeting |
| 2 | Navy polo | Khaki chinos | Brown loafers | Leather belt | Smart casual |
| 3 | Light blue button-down | Dark jeans | White sneakers | Casual watch | Weekend out |
| 4 | Gray henley | Black joggers | White trainers | Baseball cap | Gym/casual |
| 5 | Burgundy sweater | Navy trousers | Brown boots | Leather jacket | Date night |

STRICT REQUIREMENTS:
- ALL 5 outfits MUST have the SAME occasion (the one user requested)
- Provide variety in colors and styles for the SAME occasion
- ONLY return the table with outfit data
- Keep descriptions concise (max 20 characters per cell)
- Be specific about colors and items
- Don't ask questions - just give suggestions";

const WOMEN_INSTRUCTION: &str = "\
You are Style Mate, an expert AI fashion assistant for women's fashion.

CRITICAL RULES:
1. ALWAYS provide exactly 5 complete outfit suggestions for WOMEN
2. Use this EXACT format for each outfit:
• [Top Color] [Top Type] + [Bottom Color] [Bottom Type] + [Shoe Color] [Shoe Type]: [Brief reason]

REQUIREMENTS:
- ALL 5 outfits must be for the user's requested occasion
- Focus on women's clothing (blouses, dresses, skirts, heels, flats, etc.)
- Be specific about colors and items
- Give brief reasoning for each outfit
- Don't ask questions - just give suggestions";

const UNISEX_INSTRUCTION: &str = "\
You are Style Mate, an expert AI fashion assistant.

CRITICAL RULES:
1. ALWAYS provide exactly 5 complete outfit suggestions
2. Use this EXACT format for each outfit:
• [Top Color] [Top Type] + [Bottom Color] [Bottom Type] + [Shoe Color] [Shoe Type]: [Brief reason]

REQUIREMENTS:
- Focus on unisex clothing items
- Be specific about colors and items
- Give brief reasoning for each outfit
- Don't ask questions - just give suggestions";

const GREETING_INSTRUCTION: &str = "\
You are Style Mate, an expert AI fashion assistant.

When the user greets you, respond warmly and introduce yourself.
Explain that you can suggest outfit combinations for any occasion.

Be friendly, brief, and encouraging.";

pub fn is_greeting(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    GREETINGS.contains(&normalized.as_str())
}

/// System instruction for a message and preference.
///
/// Unrecognized preferences get the unisex instruction.
pub fn system_instruction(message: &str, preference: Option<StylePreference>) -> &'static str {
    if is_greeting(message) {
        return GREETING_INSTRUCTION;
    }
    match preference {
        Some(StylePreference::Men) => MEN_INSTRUCTION,
        Some(StylePreference::Women) => WOMEN_INSTRUCTION,
        Some(StylePreference::Unisex) | None => UNISEX_INSTRUCTION,
    }
}

/// Full prompt sent to the generator.
pub fn build_prompt(message: &str, preference: Option<StylePreference>) -> String {
    format!(
        "{}\nUser: {message}\nAssistant:",
        system_instruction(message, preference)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outfit::parse_outfit_table;

    #[test]
    fn greetings_are_detected() {
        assert!(is_greeting("Hello"));
        assert!(is_greeting("  hey "));
        assert!(!is_greeting("hello, what should I wear?"));
    }

    #[test]
    fn greeting_wins_over_preference() {
        assert_eq!(
            system_instruction("hi", Some(StylePreference::Men)),
            GREETING_INSTRUCTION
        );
    }

    #[test]
    fn preference_selects_instruction() {
        let msg = "Business casual outfit for summer";
        assert_eq!(system_instruction(msg, Some(StylePreference::Men)), MEN_INSTRUCTION);
        assert_eq!(system_instruction(msg, Some(StylePreference::Women)), WOMEN_INSTRUCTION);
        assert_eq!(system_instruction(msg, None), UNISEX_INSTRUCTION);
    }

    #[test]
    fn men_example_table_parses() {
        let table: String = MEN_INSTRUCTION
            .lines()
            .filter(|l| l.starts_with('|'))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_outfit_table(&table).map(|o| o.len()), Some(5));
    }

    #[test]
    fn prompt_ends_with_assistant_turn() {
        let prompt = build_prompt("Date night", Some(StylePreference::Women));
        assert!(prompt.ends_with("\nUser: Date night\nAssistant:"));
    }
}
