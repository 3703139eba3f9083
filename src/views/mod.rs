//! Page components and the service that resolves their data.
//!
//! Each view is built from whatever the backend returns for its section or,
//! when that fetch fails, from the bundled dataset for the same locale.

use std::collections::BTreeMap;

use chrono::Local;

use crate::client::ApiClient;
use crate::fallback::{self, data, Resolved, WidgetState};
use crate::i18n::Locale;
use crate::models::{ContentSectionItem, Event, NewsArticle, StaffMember};

/// Upcoming events widget content.
pub type EventsWidget = WidgetState<Event>;

/// Latest news widget content.
pub type NewsWidget = WidgetState<NewsArticle>;

const BIOGRAPHY_PREFIX: &str = "biography_p";

/// The patron page, assembled from named content slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatronView {
    pub title: Option<String>,
    pub quote: Option<String>,
    /// `biography_p1`, `biography_p2`, ... in numeric order.
    pub biography: Vec<String>,
    pub image_url: Option<String>,
}

impl PatronView {
    pub fn from_sections(sections: &[ContentSectionItem]) -> Self {
        let slot = |key: &str| sections.iter().find(|s| s.section_key == key);

        let mut paragraphs: Vec<(u32, String)> = sections
            .iter()
            .filter_map(|s| {
                let n = s.section_key.strip_prefix(BIOGRAPHY_PREFIX)?.parse().ok()?;
                Some((n, s.content.clone()?))
            })
            .collect();
        paragraphs.sort_by_key(|(n, _)| *n);

        Self {
            title: slot("title").and_then(|s| s.title.clone().or_else(|| s.content.clone())),
            quote: slot("quote").and_then(|s| s.content.clone()),
            biography: paragraphs.into_iter().map(|(_, text)| text).collect(),
            image_url: slot("image").and_then(|s| s.image_url.clone().or_else(|| s.content.clone())),
        }
    }
}

/// The history page: sections in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    pub sections: Vec<ContentSectionItem>,
}

impl HistoryView {
    pub fn from_sections(mut sections: Vec<ContentSectionItem>) -> Self {
        sections.sort_by_key(|s| (s.position, s.id));
        Self { sections }
    }
}

/// The team page: the director shown apart from everyone else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffRoster {
    pub director: Option<StaffMember>,
    pub staff: Vec<StaffMember>,
}

impl StaffRoster {
    /// Keep active members, order by position, and lift out the first director.
    pub fn from_members(members: Vec<StaffMember>) -> Self {
        let mut active: Vec<StaffMember> = members.into_iter().filter(|m| m.is_active).collect();
        active.sort_by_key(|m| (m.position, m.id));

        let director = active
            .iter()
            .position(|m| m.is_director)
            .map(|idx| active.remove(idx));

        Self {
            director,
            staff: active,
        }
    }

    pub fn len(&self) -> usize {
        self.staff.len() + usize::from(self.director.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves every page section against the backend, with per-section fallback.
#[derive(Debug, Clone)]
pub struct ContentService {
    client: ApiClient,
}

impl ContentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn patron(&self, locale: Locale) -> Resolved<PatronView> {
        fallback::fetch_list_with_fallback(
            "patron",
            locale,
            |l| self.client.content_sections("patron", l),
            data::patron_sections,
        )
        .await
        .map(|sections| PatronView::from_sections(&sections))
    }

    pub async fn history(&self, locale: Locale) -> Resolved<HistoryView> {
        fallback::fetch_list_with_fallback(
            "history",
            locale,
            |l| self.client.content_sections("history", l),
            data::history_sections,
        )
        .await
        .map(HistoryView::from_sections)
    }

    pub async fn staff_roster(&self, locale: Locale) -> Resolved<StaffRoster> {
        fallback::fetch_list_with_fallback(
            "staff",
            locale,
            |l| self.client.staff(l),
            data::staff,
        )
        .await
        .map(StaffRoster::from_members)
    }

    pub async fn upcoming_events(&self, locale: Locale, limit: usize) -> Resolved<EventsWidget> {
        let today = Local::now().date_naive();
        fallback::resolve_widget(
            "events",
            locale,
            |l| self.client.upcoming_events(l, limit),
            |l| {
                let mut events = data::events(l, today);
                events.truncate(limit);
                events
            },
        )
        .await
    }

    pub async fn latest_news(&self, locale: Locale, limit: usize) -> Resolved<NewsWidget> {
        fallback::resolve_widget(
            "news",
            locale,
            |l| self.client.news(l, limit),
            |l| {
                let mut news = data::news(l);
                news.truncate(limit);
                news
            },
        )
        .await
    }

    /// Flat translations; an empty table falls back to the bundled catalog.
    pub async fn translations(&self, locale: Locale) -> Resolved<BTreeMap<String, String>> {
        let resolved = fallback::fetch_with_fallback(
            "translations",
            locale,
            |l| self.client.translations(l),
            data::translations,
        )
        .await;

        if resolved.data.is_empty() {
            return Resolved::fallback(data::translations(locale));
        }
        resolved
    }
}
