//! # Feature: Pagination
//!
//! Server-side paginator sessions for long listings. Each paginated message
//! owns one session in a global map keyed by message id; the prev/stop/next
//! buttons mutate the session and re-render the embed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with wraparound page switching

use dashmap::DashMap;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::core::constants::BLURPLE;

/// Button id prefix for routing component interactions
pub const PAGE_PREV: &str = "page_prev";
pub const PAGE_STOP: &str = "page_stop";
pub const PAGE_NEXT: &str = "page_next";

/// Sessions are dropped on stop and lazily on expiry
const SESSION_TTL: Duration = Duration::from_secs(180);

static PAGINATORS: OnceLock<DashMap<u64, PaginatorSession>> = OnceLock::new();

/// Global paginator session map, keyed by the paginated message id.
pub fn active_paginators() -> &'static DashMap<u64, PaginatorSession> {
    PAGINATORS.get_or_init(DashMap::new)
}

/// One live paginated message.
pub struct PaginatorSession {
    title: String,
    entries: Vec<String>,
    per_page: usize,
    index: usize,
    /// Wraparound page switching when true, saturating otherwise
    clamp_pages: bool,
    pub author_id: u64,
    created: Instant,
}

impl PaginatorSession {
    pub fn new(
        title: impl Into<String>,
        entries: Vec<String>,
        per_page: usize,
        clamp_pages: bool,
        author_id: u64,
    ) -> Self {
        PaginatorSession {
            title: title.into(),
            entries,
            per_page: per_page.max(1),
            index: 0,
            clamp_pages,
            author_id,
            created: Instant::now(),
        }
    }

    /// Total number of pages (at least 1).
    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.per_page).max(1)
    }

    /// 1-based page number for the footer.
    pub fn current_page(&self) -> usize {
        self.index + 1
    }

    /// Move by `delta` pages. With clamping enabled the index wraps around the
    /// ends; otherwise it saturates at the first/last page.
    pub fn switch(&mut self, delta: i64) {
        let last = self.page_count() as i64 - 1;
        let target = self.index as i64 + delta;

        self.index = if self.clamp_pages {
            if target < 0 {
                last
            } else if target > last {
                0
            } else {
                target
            }
        } else {
            target.clamp(0, last)
        } as usize;
    }

    /// Whether the session outlived its interaction window.
    pub fn is_expired(&self) -> bool {
        self.created.elapsed() > SESSION_TTL
    }

    /// Render the current page.
    pub fn render(&self) -> CreateEmbed {
        let start = self.index * self.per_page;
        let page = self
            .entries
            .iter()
            .enumerate()
            .skip(start)
            .take(self.per_page)
            .map(|(i, entry)| format!("**{}.** {}", i + 1, entry))
            .collect::<Vec<_>>()
            .join("\n");

        let mut embed = CreateEmbed::default();
        embed
            .title(&self.title)
            .color(BLURPLE)
            .description(page)
            .footer(|f| f.text(format!("Page {}/{}", self.current_page(), self.page_count())));
        embed
    }
}

/// Prev / stop / next button row shared by all paginated messages.
pub fn create_paginator_buttons() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|btn| {
                btn.custom_id(PAGE_PREV)
                    .emoji('◀')
                    .style(ButtonStyle::Secondary)
            })
            .create_button(|btn| {
                btn.custom_id(PAGE_STOP)
                    .emoji('✖')
                    .style(ButtonStyle::Danger)
            })
            .create_button(|btn| {
                btn.custom_id(PAGE_NEXT)
                    .emoji('▶')
                    .style(ButtonStyle::Secondary)
            })
        })
        .to_owned()
}

/// Disabled copy of the button row, shown once a paginator stops.
pub fn create_disabled_paginator_buttons() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|btn| {
                btn.custom_id(PAGE_PREV)
                    .emoji('◀')
                    .style(ButtonStyle::Secondary)
                    .disabled(true)
            })
            .create_button(|btn| {
                btn.custom_id(PAGE_STOP)
                    .emoji('✖')
                    .style(ButtonStyle::Danger)
                    .disabled(true)
            })
            .create_button(|btn| {
                btn.custom_id(PAGE_NEXT)
                    .emoji('▶')
                    .style(ButtonStyle::Secondary)
                    .disabled(true)
            })
        })
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("entry {i}")).collect()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(PaginatorSession::new("t", entries(25), 10, true, 1).page_count(), 3);
        assert_eq!(PaginatorSession::new("t", entries(30), 10, true, 1).page_count(), 3);
        assert_eq!(PaginatorSession::new("t", entries(1), 10, true, 1).page_count(), 1);
        assert_eq!(PaginatorSession::new("t", entries(0), 10, true, 1).page_count(), 1);
    }

    #[test]
    fn test_switch_wraps_backwards_from_first_page() {
        let mut session = PaginatorSession::new("t", entries(25), 10, true, 1);
        session.switch(-1);
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn test_switch_wraps_forward_from_last_page() {
        let mut session = PaginatorSession::new("t", entries(25), 10, true, 1);
        session.switch(1);
        session.switch(1);
        assert_eq!(session.current_page(), 3);
        session.switch(1);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_switch_saturates_without_clamping() {
        let mut session = PaginatorSession::new("t", entries(25), 10, false, 1);
        session.switch(-1);
        assert_eq!(session.current_page(), 1);

        session.switch(10);
        assert_eq!(session.current_page(), 3);
        session.switch(1);
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn test_single_page_stays_put() {
        let mut session = PaginatorSession::new("t", entries(3), 10, true, 1);
        session.switch(1);
        assert_eq!(session.current_page(), 1);
        session.switch(-1);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_render_numbers_entries_globally() {
        let mut session = PaginatorSession::new("Tags in guild", entries(12), 10, true, 1);
        session.switch(1);
        let embed = session.render();
        let description = embed.0.get("description").unwrap().as_str().unwrap();
        assert!(description.contains("**11.** entry 10"));
        assert!(description.contains("**12.** entry 11"));
        assert!(!description.contains("entry 9"));
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let session = PaginatorSession::new("t", entries(3), 10, true, 1);
        assert!(!session.is_expired());
    }
}
