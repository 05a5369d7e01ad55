//! Terminal rendering of chat content.

use std::fmt::Write;

use crate::models::{Message, MessageRole, Session};
use crate::outfit::{parse_outfit_table, OutfitRecord};

/// Heading printed above parsed outfit cards.
const CARDS_HEADING: &str = "Here are your personalized outfit suggestions:";

/// Render message content: outfit cards for tables, the raw text otherwise.
pub fn render_content(content: &str) -> String {
    match parse_outfit_table(content) {
        Some(outfits) => render_cards(&outfits),
        None => content.to_string(),
    }
}

fn render_cards(outfits: &[OutfitRecord]) -> String {
    let mut out = String::new();
    writeln!(out, "✨ {CARDS_HEADING}").ok();
    for outfit in outfits {
        out.push('\n');
        out.push_str(&render_card(outfit));
    }
    out
}

/// Render one outfit as a small card.
pub fn render_card(outfit: &OutfitRecord) -> String {
    let rows = [
        ("Top", outfit.top.as_str()),
        ("Bottom", outfit.bottom.as_str()),
        ("Footwear", outfit.footwear.as_str()),
        ("Accessories", outfit.accessory.as_str()),
    ];

    let mut card = String::new();
    writeln!(card, "┌ Outfit {} · {}", outfit.label, outfit.occasion_tag).ok();
    for (name, value) in rows {
        writeln!(card, "│ {name:<11} {value}").ok();
    }
    card.push_str("└\n");
    card
}

/// Render a whole message with a role prefix.
pub fn render_message(message: &Message) -> String {
    let who = match message.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "stylemate",
    };
    format!(
        "[{}] {who}:\n{}",
        message.timestamp.format("%H:%M"),
        render_content(&message.content)
    )
}

/// One line of the session list.
pub fn render_session_line(index: usize, session: &Session, current: bool) -> String {
    let marker = if current { '*' } else { ' ' };
    format!(
        "{marker} {index:>2}. {} ({} messages)",
        session.title,
        session.messages().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TITLE;

    #[test]
    fn plain_text_is_passed_through() {
        let text = "Hello!\nWhat are you looking to style today?";
        assert_eq!(render_content(text), text);
    }

    #[test]
    fn tables_become_cards() {
        let text = "A|Top|Bottom|Shoes\n---|---|---|---\n1|Tee|Jeans|Sneakers|Belt|Casual";
        let rendered = render_content(text);
        assert!(rendered.contains(CARDS_HEADING));
        assert!(rendered.contains("Outfit 1 · Casual"));
        assert!(rendered.contains("Footwear    Sneakers"));
        assert!(rendered.contains("Accessories Belt"));
    }

    #[test]
    fn session_line_marks_current() {
        let session = Session::new(DEFAULT_TITLE);
        assert_eq!(render_session_line(1, &session, true), "*  1. New Chat (1 messages)");
        assert!(render_session_line(2, &session, false).starts_with("   2."));
    }
}
