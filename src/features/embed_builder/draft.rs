//! Embed draft state machine.
//!
//! Pure data; the interaction layer mutates a clone and commits it only when
//! the draft still fits Discord's shared character budget.

use serde_json::{json, Value};
use serenity::builder::CreateEmbed;

/// Shared budget across title, description, author, footer and fields
pub const MAX_TOTAL_CHARS: usize = 6000;
/// Discord's per-embed field cap
pub const MAX_FIELDS: usize = 25;

/// Placeholder shown when the last piece of content is removed; an embed with
/// no content at all cannot be sent.
pub const PLACEHOLDER_DESCRIPTION: &str = "Lorem ipsum dolor sit amet.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// An embed under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub footer: Option<EmbedFooter>,
    pub fields: Vec<EmbedField>,
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl EmbedDraft {
    /// Characters counted against the shared 6000 budget: title, description,
    /// author name, footer text, and every field name and value.
    pub fn char_count(&self) -> usize {
        let mut total = 0;
        if let Some(title) = &self.title {
            total += title.chars().count();
        }
        if let Some(description) = &self.description {
            total += description.chars().count();
        }
        if let Some(author) = &self.author {
            total += author.name.chars().count();
        }
        if let Some(footer) = &self.footer {
            total += footer.text.chars().count();
        }
        for field in &self.fields {
            total += field.name.chars().count() + field.value.chars().count();
        }
        total
    }

    pub fn fits_budget(&self) -> bool {
        self.char_count() <= MAX_TOTAL_CHARS
    }

    /// An embed with no text content cannot be sent or exported.
    pub fn is_empty(&self) -> bool {
        self.char_count() == 0
    }

    /// Apply the "Embed" modal: title, description, image, thumbnail, color.
    /// Empty inputs clear the component. Returns `Err` on an unparsable color.
    pub fn set_basic(
        &mut self,
        title: &str,
        description: &str,
        image_url: &str,
        thumbnail_url: &str,
        color: &str,
    ) -> Result<(), String> {
        self.title = none_if_empty(title);
        self.description = none_if_empty(description);
        self.image_url = none_if_empty(image_url);
        self.thumbnail_url = none_if_empty(thumbnail_url);

        if let Some(raw) = none_if_empty(color) {
            match parse_color(&raw) {
                Some(parsed) => self.color = Some(parsed),
                None => return Err(format!("Invalid color: {raw}")),
            }
        }
        Ok(())
    }

    pub fn set_author(&mut self, name: &str, url: &str, icon_url: &str) {
        self.author = none_if_empty(name).map(|name| EmbedAuthor {
            name,
            url: none_if_empty(url),
            icon_url: none_if_empty(icon_url),
        });
    }

    pub fn set_footer(&mut self, text: &str, icon_url: &str) {
        self.footer = none_if_empty(text).map(|text| EmbedFooter {
            text,
            icon_url: none_if_empty(icon_url),
        });
    }

    /// Title URLs require a title to attach to.
    pub fn set_url(&mut self, url: &str) -> Result<(), String> {
        if self.title.is_none() {
            return Err("Embed must have a title.".to_string());
        }
        self.url = none_if_empty(url);
        Ok(())
    }

    /// Insert a field at a 0-based index, clamped to the current field count.
    /// Fails when the embed already carries [`MAX_FIELDS`] fields.
    pub fn insert_field(&mut self, index: usize, field: EmbedField) -> Result<(), String> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(format!("Embed reached maximum of {MAX_FIELDS} fields."));
        }
        let index = index.min(self.fields.len());
        self.fields.insert(index, field);
        Ok(())
    }

    /// Remove the field at `index`. When the embed would end up with no
    /// content at all, a placeholder description is installed.
    pub fn remove_field(&mut self, index: usize) -> Option<EmbedField> {
        if index >= self.fields.len() {
            return None;
        }
        let removed = self.fields.remove(index);
        if self.is_empty() {
            self.description = Some(PLACEHOLDER_DESCRIPTION.to_string());
        }
        Some(removed)
    }

    /// Replace the field at `old_index`, re-inserting at `new_index`.
    pub fn move_field(
        &mut self,
        old_index: usize,
        new_index: usize,
        field: EmbedField,
    ) -> Result<(), String> {
        if old_index >= self.fields.len() {
            return Err("Index out of range.".to_string());
        }
        self.fields.remove(old_index);
        let new_index = new_index.min(self.fields.len());
        self.fields.insert(new_index, field);
        Ok(())
    }

    /// Build the serenity embed for display.
    pub fn to_create_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        if let Some(title) = &self.title {
            embed.title(title);
        }
        if let Some(description) = &self.description {
            embed.description(description);
        }
        if let Some(url) = &self.url {
            embed.url(url);
        }
        if let Some(color) = self.color {
            embed.color(color);
        }
        if let Some(image_url) = &self.image_url {
            embed.image(image_url);
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            embed.thumbnail(thumbnail_url);
        }
        if let Some(author) = &self.author {
            embed.author(|a| {
                a.name(&author.name);
                if let Some(url) = &author.url {
                    a.url(url);
                }
                if let Some(icon_url) = &author.icon_url {
                    a.icon_url(icon_url);
                }
                a
            });
        }
        if let Some(footer) = &self.footer {
            embed.footer(|f| {
                f.text(&footer.text);
                if let Some(icon_url) = &footer.icon_url {
                    f.icon_url(icon_url);
                }
                f
            });
        }
        for field in &self.fields {
            embed.field(&field.name, &field.value, field.inline);
        }
        embed
    }

    /// Discord-shaped embed object, used for the JSON export and webhook send.
    pub fn to_json_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        if let Some(title) = &self.title {
            object.insert("title".into(), json!(title));
        }
        if let Some(description) = &self.description {
            object.insert("description".into(), json!(description));
        }
        if let Some(url) = &self.url {
            object.insert("url".into(), json!(url));
        }
        if let Some(color) = self.color {
            object.insert("color".into(), json!(color));
        }
        if let Some(image_url) = &self.image_url {
            object.insert("image".into(), json!({ "url": image_url }));
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            object.insert("thumbnail".into(), json!({ "url": thumbnail_url }));
        }
        if let Some(author) = &self.author {
            let mut entry = serde_json::Map::new();
            entry.insert("name".into(), json!(author.name));
            if let Some(url) = &author.url {
                entry.insert("url".into(), json!(url));
            }
            if let Some(icon_url) = &author.icon_url {
                entry.insert("icon_url".into(), json!(icon_url));
            }
            object.insert("author".into(), Value::Object(entry));
        }
        if let Some(footer) = &self.footer {
            let mut entry = serde_json::Map::new();
            entry.insert("text".into(), json!(footer.text));
            if let Some(icon_url) = &footer.icon_url {
                entry.insert("icon_url".into(), json!(icon_url));
            }
            object.insert("footer".into(), Value::Object(entry));
        }
        if !self.fields.is_empty() {
            let fields: Vec<Value> = self
                .fields
                .iter()
                .map(|f| json!({ "name": f.name, "value": f.value, "inline": f.inline }))
                .collect();
            object.insert("fields".into(), Value::Array(fields));
        }
        Value::Object(object)
    }
}

/// Parse `#RRGGBB`, `0xRRGGBB` or `rgb(r, g, b)` into a packed color.
pub fn parse_color(input: &str) -> Option<u32> {
    let input = input.trim();

    if let Some(hex) = input
        .strip_prefix('#')
        .or_else(|| input.strip_prefix("0x"))
        .or_else(|| input.strip_prefix("0X"))
    {
        if hex.len() == 6 {
            return u32::from_str_radix(hex, 16).ok();
        }
        return None;
    }

    let lower = input.to_lowercase();
    if let Some(inner) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return None;
        }
        let mut channels = [0u32; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let value: u32 = part.parse().ok()?;
            if value > 255 {
                return None;
            }
            *slot = value;
        }
        return Some((channels[0] << 16) | (channels[1] << 8) | channels[2]);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, value: &str) -> EmbedField {
        EmbedField {
            name: name.to_string(),
            value: value.to_string(),
            inline: true,
        }
    }

    #[test]
    fn test_char_count_covers_all_text_parts() {
        let mut draft = EmbedDraft::default();
        draft.title = Some("12345".to_string());
        draft.description = Some("1234567890".to_string());
        draft.set_author("abc", "", "");
        draft.set_footer("de", "");
        draft.insert_field(0, field("name", "value")).unwrap();

        assert_eq!(draft.char_count(), 5 + 10 + 3 + 2 + 4 + 5);
    }

    #[test]
    fn test_budget_rollback_flow() {
        let mut draft = EmbedDraft::default();
        draft.description = Some("x".repeat(5990));
        assert!(draft.fits_budget());

        // The interaction layer mutates a clone and drops it when over budget.
        let mut candidate = draft.clone();
        candidate.insert_field(0, field("name", "a long value")).unwrap();
        assert!(!candidate.fits_budget());
        assert!(draft.fits_budget());
    }

    #[test]
    fn test_budget_boundary_is_inclusive() {
        let mut draft = EmbedDraft::default();
        draft.description = Some("x".repeat(MAX_TOTAL_CHARS));
        assert!(draft.fits_budget());

        draft.title = Some("y".to_string());
        assert!(!draft.fits_budget());
    }

    #[test]
    fn test_field_cap() {
        let mut draft = EmbedDraft::default();
        for i in 0..MAX_FIELDS {
            draft.insert_field(usize::MAX, field(&format!("f{i}"), "v")).unwrap();
        }
        assert!(draft.insert_field(0, field("extra", "v")).is_err());
        assert_eq!(draft.fields.len(), MAX_FIELDS);
    }

    #[test]
    fn test_insert_field_clamps_index() {
        let mut draft = EmbedDraft::default();
        draft.insert_field(0, field("a", "1")).unwrap();
        draft.insert_field(100, field("b", "2")).unwrap();
        draft.insert_field(1, field("c", "3")).unwrap();

        let names: Vec<_> = draft.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_remove_last_content_installs_placeholder() {
        let mut draft = EmbedDraft::default();
        draft.insert_field(0, field("only", "one")).unwrap();

        draft.remove_field(0);
        assert_eq!(draft.description.as_deref(), Some(PLACEHOLDER_DESCRIPTION));
    }

    #[test]
    fn test_move_field_reorders() {
        let mut draft = EmbedDraft::default();
        draft.insert_field(0, field("a", "1")).unwrap();
        draft.insert_field(1, field("b", "2")).unwrap();
        draft.insert_field(2, field("c", "3")).unwrap();

        let moved = draft.fields[2].clone();
        draft.move_field(2, 0, moved).unwrap();
        let names: Vec<_> = draft.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_set_url_requires_title() {
        let mut draft = EmbedDraft::default();
        assert!(draft.set_url("https://example.com").is_err());

        draft.title = Some("Title".to_string());
        assert!(draft.set_url("https://example.com").is_ok());
        assert_eq!(draft.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_set_basic_clears_with_empty_input() {
        let mut draft = EmbedDraft::default();
        draft.set_basic("Title", "Description", "", "", "").unwrap();
        assert_eq!(draft.title.as_deref(), Some("Title"));

        draft.set_basic("", "", "", "", "").unwrap();
        assert!(draft.title.is_none());
        assert!(draft.description.is_none());
    }

    #[test]
    fn test_set_basic_rejects_bad_color() {
        let mut draft = EmbedDraft::default();
        assert!(draft.set_basic("t", "", "", "", "not-a-color").is_err());
    }

    #[test]
    fn test_parse_color_formats() {
        assert_eq!(parse_color("#FFFFFF"), Some(0xFFFFFF));
        assert_eq!(parse_color("#1f87a7"), Some(0x1f87a7));
        assert_eq!(parse_color("0xF0B232"), Some(0xF0B232));
        assert_eq!(parse_color("rgb(255, 0, 16)"), Some(0xFF0010));
        assert_eq!(parse_color("rgb(0,0,0)"), Some(0));
        assert_eq!(parse_color("rgb(256, 0, 0)"), None);
        assert_eq!(parse_color("#FFF"), None);
        assert_eq!(parse_color("blue"), None);
    }

    #[test]
    fn test_json_export_shape() {
        let mut draft = EmbedDraft::default();
        draft.title = Some("Title".to_string());
        draft.color = Some(0x1f87a7);
        draft.set_footer("footer text", "https://example.com/icon.png");
        draft.insert_field(0, field("f", "v")).unwrap();

        let value = draft.to_json_value();
        assert_eq!(value["title"], "Title");
        assert_eq!(value["color"], 0x1f87a7);
        assert_eq!(value["footer"]["text"], "footer text");
        assert_eq!(value["fields"][0]["name"], "f");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_empty_draft() {
        let draft = EmbedDraft::default();
        assert!(draft.is_empty());
        assert_eq!(draft.to_json_value(), json!({}));
    }
}
