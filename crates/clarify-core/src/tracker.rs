//! Selection tracking.
//!
//! Turns raw input events plus the host's live selection into a decision:
//! offer actions on a new selection, offer restore on an existing mutated
//! region, hide the menu, or do nothing.

use clarify_config::SelectionSettings;
use clarify_dom::mutation::enclosing_region;
use clarify_dom::{Document, MutatedRegion, NodeId, Point, Range, ViewportInfo};
use tracing::debug;

use crate::layout::LayoutProvider;
use crate::session::SelectionSnapshot;
use crate::ui::{MenuKind, MenuPlacement};

/// Where an input event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Page(NodeId),
    /// Inside the anchor menu.
    Menu,
    /// Inside the result surface.
    ResultSurface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerUp {
        target: EventTarget,
        pointer: Option<Point>,
    },
    KeyUp {
        target: EventTarget,
    },
    PointerDown {
        target: EventTarget,
        pointer: Option<Point>,
    },
    Scroll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerDecision {
    Ignore,
    ShowActions {
        snapshot: SelectionSnapshot,
        menu: MenuPlacement,
    },
    ShowRestore {
        region: MutatedRegion,
        menu: MenuPlacement,
    },
    HideMenu,
}

pub struct SelectionTracker {
    settings: SelectionSettings,
}

impl SelectionTracker {
    pub fn new(settings: SelectionSettings) -> Self {
        Self { settings }
    }

    /// Decide what an input event means. `menu` is the currently visible
    /// anchor menu, if any.
    pub fn handle(
        &self,
        doc: &Document,
        selection: Option<&Range>,
        event: &InputEvent,
        menu: Option<&MenuPlacement>,
        layout: &dyn LayoutProvider,
    ) -> TrackerDecision {
        match *event {
            InputEvent::PointerUp { target, pointer } => {
                self.on_selection(doc, selection, target, pointer, layout)
            }
            InputEvent::KeyUp { target } => self.on_selection(doc, selection, target, None, layout),
            InputEvent::PointerDown { target, pointer } => {
                let Some(menu) = menu else {
                    return TrackerDecision::Ignore;
                };
                let inside = target == EventTarget::Menu
                    || pointer.is_some_and(|p| menu.rect().contains(p));
                if inside {
                    TrackerDecision::Ignore
                } else {
                    TrackerDecision::HideMenu
                }
            }
            InputEvent::Scroll => {
                if menu.is_some() {
                    TrackerDecision::HideMenu
                } else {
                    TrackerDecision::Ignore
                }
            }
        }
    }

    fn on_selection(
        &self,
        doc: &Document,
        selection: Option<&Range>,
        target: EventTarget,
        pointer: Option<Point>,
        layout: &dyn LayoutProvider,
    ) -> TrackerDecision {
        if matches!(target, EventTarget::Menu | EventTarget::ResultSurface) {
            return TrackerDecision::Ignore;
        }

        if let Some(region) = self.targeted_region(doc, selection, target) {
            let rect = layout.node_rect(doc, region.node());
            let menu = self.place(MenuKind::Restore, rect.top_right(), layout.viewport());
            debug!(node = region.node().index(), "Selection on mutated region");
            return TrackerDecision::ShowRestore { region, menu };
        }

        let Some(range) = selection.filter(|r| doc.check_range(r).is_ok()) else {
            return TrackerDecision::Ignore;
        };
        let text = range.text(doc).trim().to_string();
        let length = text.chars().count();
        if length <= self.settings.min_length {
            debug!(length, "Selection too short");
            return TrackerDecision::Ignore;
        }

        let anchor = pointer.unwrap_or_else(|| layout.range_rect(doc, range).top_right());
        let anchor = anchor.offset(self.settings.anchor_offset, -self.settings.anchor_offset);
        let menu = self.place(MenuKind::Actions, anchor, layout.viewport());
        debug!(length, x = menu.position.x, y = menu.position.y, "Selection captured");
        TrackerDecision::ShowActions {
            snapshot: SelectionSnapshot { range: *range, text },
            menu,
        }
    }

    /// A mutated region under the selection anchor or the event target.
    fn targeted_region(
        &self,
        doc: &Document,
        selection: Option<&Range>,
        target: EventTarget,
    ) -> Option<MutatedRegion> {
        let from_selection = selection
            .map(|r| r.start().node)
            .filter(|n| doc.contains(*n))
            .and_then(|n| enclosing_region(doc, n));
        from_selection.or_else(|| match target {
            EventTarget::Page(node) => enclosing_region(doc, node),
            _ => None,
        })
    }

    /// Clamp a menu of `kind` anchored at `anchor` into the viewport.
    pub fn place(&self, kind: MenuKind, anchor: Point, viewport: ViewportInfo) -> MenuPlacement {
        let margin = self.settings.viewport_margin;
        let (width, height) = kind.size();
        let x = (viewport.width - width - margin).min(anchor.x.max(margin));
        let y = (viewport.height - height - margin).min(anchor.y.max(margin));
        MenuPlacement {
            kind,
            position: Point::new(x, y),
        }
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
