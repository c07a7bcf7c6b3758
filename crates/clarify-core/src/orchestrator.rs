//! Transformation orchestration.
//!
//! The orchestrator owns the UI state, the active [`Session`] and the
//! collaborators, and turns tracker decisions and user actions into document
//! changes. Remote requests are split in two: [`Orchestrator::invoke`] spawns
//! the request and [`Orchestrator::complete`] lands its response, so the host
//! keeps handling events while a request is in flight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clarify_config::Config;
use clarify_dom::bionic::apply_bionic;
use clarify_dom::{Document, MutatedRegion, MutationEngine, Range};
use clarify_protocols::{Clipboard, ProviderError, TransformRequest, TransformService};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::layout::LayoutProvider;
use crate::mode::TransformMode;
use crate::session::Session;
use crate::tracker::{InputEvent, SelectionTracker, TrackerDecision};
use crate::ui::{CopyLabel, MenuKind, MenuPlacement, ResultAction, UiAction, UiState, render_error};

/// Outcome of a remote request, tagged with the session that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResponse {
    pub generation: u64,
    pub mode: TransformMode,
    pub outcome: Result<String, ProviderError>,
}

/// A remote request running on the tokio runtime.
#[derive(Debug)]
pub struct PendingRequest {
    generation: u64,
    mode: TransformMode,
    handle: JoinHandle<Result<String, ProviderError>>,
}

impl PendingRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Cancel the underlying task. `wait` then reports a channel error.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub async fn wait(self) -> TransformResponse {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ProviderError::Channel(e.to_string())),
        };
        TransformResponse {
            generation: self.generation,
            mode: self.mode,
            outcome,
        }
    }
}

/// What the result surface currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub state: UiState,
    pub body: Option<String>,
    pub actions: &'static [ResultAction],
    pub copy_label: &'static str,
}

pub struct Orchestrator {
    tracker: SelectionTracker,
    engine: MutationEngine,
    service: Arc<dyn TransformService>,
    clipboard: Arc<dyn Clipboard>,
    layout: Arc<dyn LayoutProvider>,
    state: UiState,
    menu: Option<MenuPlacement>,
    restore_target: Option<MutatedRegion>,
    session: Session,
    body: Option<String>,
    copy_label: CopyLabel,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        service: Arc<dyn TransformService>,
        clipboard: Arc<dyn Clipboard>,
        layout: Arc<dyn LayoutProvider>,
    ) -> Self {
        Self {
            tracker: SelectionTracker::new(config.selection.clone()),
            engine: MutationEngine::new(),
            service,
            clipboard,
            layout,
            state: UiState::Hidden,
            menu: None,
            restore_target: None,
            session: Session::default(),
            body: None,
            copy_label: CopyLabel::new(Duration::from_millis(config.ui.copied_label_ms)),
        }
    }

    /// Replace the mutation engine, e.g. to use a different snapshot codec.
    pub fn with_engine(mut self, engine: MutationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn menu(&self) -> Option<&MenuPlacement> {
        self.menu.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Region the restore menu is offered for.
    pub fn restore_target(&self) -> Option<MutatedRegion> {
        self.restore_target
    }

    pub fn copy_label(&self) -> &'static str {
        self.copy_label.label_at(Instant::now())
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.state.result_visible().then(|| ResultView {
            state: self.state,
            body: self.body.clone(),
            actions: self.state.result_actions(),
            copy_label: self.copy_label(),
        })
    }

    fn transition(&mut self, action: UiAction) -> bool {
        match self.state.transition(action) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, ?action, "UI transition");
                self.state = next;
                if next.menu().is_none() {
                    self.menu = None;
                    self.restore_target = None;
                }
                true
            }
            None => {
                debug!(state = ?self.state, ?action, "Action not available");
                false
            }
        }
    }

    /// Run the tracker over an input event and act on its decision.
    pub fn handle_event(
        &mut self,
        doc: &Document,
        selection: Option<&Range>,
        event: &InputEvent,
    ) -> TrackerDecision {
        let decision = self
            .tracker
            .handle(doc, selection, event, self.menu.as_ref(), self.layout.as_ref());

        match &decision {
            TrackerDecision::ShowActions { snapshot, menu } => {
                self.session = self.session.next(snapshot.clone());
                self.body = None;
                self.copy_label.reset();
                self.transition(UiAction::Select);
                self.menu = Some(*menu);
                self.restore_target = None;
                info!(generation = self.session.generation(), "New selection session");
            }
            TrackerDecision::ShowRestore { region, menu } => {
                self.body = None;
                self.transition(UiAction::SelectRegion);
                self.menu = Some(*menu);
                self.restore_target = Some(*region);
            }
            TrackerDecision::HideMenu => {
                self.transition(UiAction::Dismiss);
            }
            TrackerDecision::Ignore => {}
        }
        decision
    }

    /// Run `mode` on the stored selection.
    ///
    /// Bionic reading rewrites the document immediately and returns `None`.
    /// Remote modes move the surface to loading and return the spawned
    /// request; pass its response to [`Orchestrator::complete`].
    pub fn invoke(&mut self, doc: &mut Document, mode: TransformMode) -> Option<PendingRequest> {
        let Some(text) = self.session.selected_text().map(str::to_string) else {
            warn!(%mode, "No stored selection to transform");
            return None;
        };

        if mode.is_local() {
            if !self.transition(UiAction::InvokeLocal) {
                return None;
            }
            if let Some(snapshot) = self.session.consume_snapshot() {
                match apply_bionic(doc, &snapshot.range) {
                    Ok(()) => info!(chars = text.chars().count(), "Bionic reading applied"),
                    Err(e) => error!(error = %e, "Bionic reading failed"),
                }
            }
            return None;
        }

        let instruction = mode.instruction().unwrap_or_default().to_string();
        if !self.transition(UiAction::InvokeRemote) {
            return None;
        }
        self.body = None;
        self.copy_label.reset();

        let generation = self.session.generation();
        let service = Arc::clone(&self.service);
        let request = TransformRequest { instruction, text };
        let handle = tokio::spawn(async move { service.transform(request).await });
        info!(%mode, generation, "Transformation requested");

        Some(PendingRequest {
            generation,
            mode,
            handle,
        })
    }

    /// Land a response. Returns false when it was dropped as stale.
    pub fn complete(&mut self, response: TransformResponse) -> bool {
        if response.generation != self.session.generation() || self.state != UiState::Loading {
            debug!(
                generation = response.generation,
                current = self.session.generation(),
                state = ?self.state,
                "Dropping stale response"
            );
            return false;
        }

        match response.outcome {
            Ok(text) => {
                self.body = Some(text.clone());
                self.session.set_last_text(text);
                self.transition(UiAction::Succeed)
            }
            Err(e) => {
                warn!(mode = %response.mode, error = %e, "Transformation failed");
                self.body = Some(render_error(&e.user_message()));
                self.transition(UiAction::Fail)
            }
        }
    }

    /// Substitute the generated text into the page.
    pub fn apply(&mut self, doc: &mut Document) -> Option<MutatedRegion> {
        if self.state.transition(UiAction::Apply).is_none() {
            debug!(state = ?self.state, "Nothing to apply");
            return None;
        }
        let text = self.session.last_text()?.to_string();
        let Some(range) = self.session.snapshot().map(|s| s.range) else {
            warn!("No selection snapshot to apply to");
            return None;
        };

        let region = self.engine.apply(doc, &range, &text)?;
        self.session.set_region(Some(region));
        self.transition(UiAction::Apply);
        info!(node = region.node().index(), "Result applied to page");
        Some(region)
    }

    /// Reverse the last apply and offer copy/apply again.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        if self.state.transition(UiAction::Undo).is_none() {
            return false;
        }
        if let Some(region) = self.session.region() {
            match self.engine.restore_range(doc, region) {
                Some(range) => self.session.relocate(range),
                None => warn!("Undo found nothing to restore"),
            }
            self.session.set_region(None);
        }
        self.transition(UiAction::Undo)
    }

    /// Dismiss the result surface after applying.
    pub fn done(&mut self) -> bool {
        self.state == UiState::ResultApplied && self.transition(UiAction::Close)
    }

    /// Close the result surface. Closing while loading abandons the request.
    pub fn close(&mut self) -> bool {
        let closed = self.transition(UiAction::Close);
        if closed {
            self.body = None;
        }
        closed
    }

    /// Copy the generated text.
    pub fn copy(&mut self) -> bool {
        if !self.state.result_actions().contains(&ResultAction::Copy) {
            return false;
        }
        let Some(text) = self.session.last_text() else {
            return false;
        };
        self.clipboard.write_text(text);
        self.copy_label.mark_copied(Instant::now());
        debug!(chars = text.chars().count(), "Copied result");
        true
    }

    /// Restore a mutated region, typically the one the restore menu was
    /// offered for. Restoring the session's own region while the result
    /// surface shows it as applied behaves like undo.
    pub fn restore(&mut self, doc: &mut Document, region: MutatedRegion) -> bool {
        let own = self.session.region() == Some(region);
        let restored = if own {
            let range = self.engine.restore_range(doc, region);
            if let Some(range) = range {
                self.session.relocate(range);
            }
            self.session.set_region(None);
            range.is_some()
        } else {
            self.engine.restore(doc, region)
        };

        match self.state {
            UiState::ResultApplied if own => {
                self.transition(UiAction::Undo);
            }
            UiState::AnchorVisible(MenuKind::Restore) => {
                self.transition(UiAction::Restore);
            }
            _ => {}
        }
        restored
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
