use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::FEED;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::news::snapshot::FeedSnapshot;

/// Identity of one rendered list entry. Never reused within a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: ElementId,
    pub title: String,
    pub link: String,
    pub preview: String,
}

/// Elements whose hover tooltip has been wired up.
///
/// Binding is idempotent per element: the second `bind` for the same id is a
/// no-op and returns false.
#[derive(Debug, Default)]
pub struct TooltipRegistry {
    bound: HashSet<ElementId>,
}

impl TooltipRegistry {
    pub fn bind(&mut self, id: ElementId) -> bool {
        self.bound.insert(id)
    }

    pub fn is_bound(&self, id: ElementId) -> bool {
        self.bound.contains(&id)
    }

    /// Forget elements that are no longer on screen.
    pub fn retain_only(&mut self, live: &[ElementId]) {
        self.bound.retain(|id| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Retained state of the news header, list and error line.
#[derive(Debug)]
pub struct FeedView {
    header: String,
    entries: Vec<ListEntry>,
    error_visible: bool,
    updated_at: Option<DateTime<Local>>,
    rendered: Option<Arc<FeedSnapshot>>,
    tooltips: TooltipRegistry,
    next_id: u64,
}

impl Default for FeedView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedView {
    pub fn new() -> Self {
        Self {
            header: FEED.loading_header.to_string(),
            entries: Vec::new(),
            error_visible: false,
            updated_at: None,
            rendered: None,
            tooltips: TooltipRegistry::default(),
            next_id: 0,
        }
    }

    /// Rebuilds header and list from `snapshot`.
    ///
    /// Returns false without touching anything if this exact snapshot is
    /// already on screen, so cache hits keep element identities stable.
    pub fn render_snapshot(
        &mut self,
        snapshot: &Arc<FeedSnapshot>,
        updated_at: DateTime<Local>,
    ) -> bool {
        if let Some(current) = &self.rendered {
            if Arc::ptr_eq(current, snapshot) {
                return false;
            }
        }

        self.header = snapshot.header();
        self.entries.clear();

        for item in &snapshot.items {
            let id = ElementId(self.next_id);
            self.next_id += 1;
            self.entries.push(ListEntry {
                id,
                title: item.title.clone(),
                link: item.link.clone(),
                preview: item.preview.clone(),
            });
        }

        let live: Vec<ElementId> = self.entries.iter().map(|entry| entry.id).collect();
        self.tooltips.retain_only(&live);
        for id in live {
            if self.tooltips.bind(id) {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_tooltip_bindings {
                    log::info!("Tooltip bound for {:?}", id);
                }
            }
        }

        self.updated_at = Some(updated_at);
        self.rendered = Some(Arc::clone(snapshot));
        true
    }

    pub fn show_error(&mut self) {
        self.error_visible = true;
    }

    pub fn hide_error(&mut self) {
        self.error_visible = false;
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error_visible.then_some(FEED.error_message)
    }

    pub fn is_error_visible(&self) -> bool {
        self.error_visible
    }

    pub fn updated_at(&self) -> Option<&DateTime<Local>> {
        self.updated_at.as_ref()
    }

    pub fn tooltips(&self) -> &TooltipRegistry {
        &self.tooltips
    }

    /// True once any snapshot has been rendered
    pub fn has_content(&self) -> bool {
        self.rendered.is_some()
    }
}
