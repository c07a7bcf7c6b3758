//! Explicit UI state machine for the anchor menu and the result surface.

use std::time::{Duration, Instant};

use clarify_dom::{BoundingBox, Point};
use serde::Serialize;

/// Which anchor menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuKind {
    /// Simplify / summarize / bionic-read.
    Actions,
    /// Single "undo changes" button over a mutated region.
    Restore,
}

impl MenuKind {
    /// Estimated rendered size `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Actions => (320.0, 50.0),
            Self::Restore => (140.0, 50.0),
        }
    }
}

/// A visible anchor menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MenuPlacement {
    pub kind: MenuKind,
    /// Top-left corner in viewport coordinates.
    pub position: Point,
}

impl MenuPlacement {
    pub fn rect(&self) -> BoundingBox {
        let (width, height) = self.kind.size();
        BoundingBox::new(self.position.x, self.position.y, width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Hidden,
    AnchorVisible(MenuKind),
    Loading,
    ResultSuccess,
    ResultFailed,
    ResultApplied,
}

/// User actions and service outcomes that drive [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// A selection long enough to act on.
    Select,
    /// A selection on an existing mutated region.
    SelectRegion,
    /// Scroll or pointer-down outside the menu.
    Dismiss,
    InvokeRemote,
    InvokeLocal,
    Succeed,
    Fail,
    Apply,
    Undo,
    Restore,
    /// "Done" after applying, or the close button.
    Close,
}

/// Buttons shown in the result surface footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultAction {
    Copy,
    Apply,
    Done,
    Undo,
}

impl UiState {
    /// Next state for `action`, or `None` when the action is not available
    /// in this state.
    pub fn transition(self, action: UiAction) -> Option<UiState> {
        use UiAction::*;
        use UiState::*;

        match (self, action) {
            (_, Select) => Some(AnchorVisible(MenuKind::Actions)),
            (_, SelectRegion) => Some(AnchorVisible(MenuKind::Restore)),
            (AnchorVisible(_), Dismiss) => Some(Hidden),
            (AnchorVisible(MenuKind::Actions), InvokeRemote) => Some(Loading),
            (AnchorVisible(MenuKind::Actions), InvokeLocal) => Some(Hidden),
            (AnchorVisible(MenuKind::Restore), Restore) => Some(Hidden),
            (Loading, Succeed) => Some(ResultSuccess),
            (Loading, Fail) => Some(ResultFailed),
            (ResultSuccess, Apply) => Some(ResultApplied),
            (ResultApplied, Undo) => Some(ResultSuccess),
            (Loading | ResultSuccess | ResultFailed | ResultApplied, Close) => Some(Hidden),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<MenuKind> {
        match self {
            Self::AnchorVisible(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn result_visible(&self) -> bool {
        matches!(
            self,
            Self::Loading | Self::ResultSuccess | Self::ResultFailed | Self::ResultApplied
        )
    }

    /// Footer buttons for the result surface.
    pub fn result_actions(&self) -> &'static [ResultAction] {
        match self {
            Self::ResultSuccess => &[ResultAction::Copy, ResultAction::Apply],
            Self::ResultApplied => &[ResultAction::Done, ResultAction::Undo],
            _ => &[],
        }
    }
}

/// Text shown in the result surface for a failed request.
pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

/// Copy button label, reading "Copied!" for a while after each copy.
#[derive(Debug, Clone)]
pub struct CopyLabel {
    hold: Duration,
    copied_at: Option<Instant>,
}

impl CopyLabel {
    pub fn new(hold: Duration) -> Self {
        Self { hold, copied_at: None }
    }

    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn reset(&mut self) {
        self.copied_at = None;
    }

    pub fn label_at(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < self.hold => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
