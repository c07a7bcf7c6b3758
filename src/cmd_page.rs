//! Page subcommand handlers: transform, restore and ask.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{info, warn};

use clarify_config::Config;
use clarify_core::{
    EventTarget, InputEvent, LayeredCredentialStore, LlmTransformService, MemoryClipboard,
    Orchestrator, PageAssistant, StaticLayout, TrackerDecision, TransformMode, UiState,
};
use clarify_dom::{Document, MutationEngine};
use clarify_protocols::{CredentialStore, TransformService};
use clarify_provider_groq::GroqProvider;

fn read_page(path: &Path) -> anyhow::Result<Document> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    Ok(Document::parse(&html))
}

fn write_page(doc: &Document, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, doc.to_html())
                .with_context(|| format!("Failed to write page {}", path.display()))?;
            info!(path = %path.display(), "Page written");
        }
        None => println!("{}", doc.to_html()),
    }
    Ok(())
}

fn credentials(config: &Config) -> Arc<dyn CredentialStore> {
    Arc::new(LayeredCredentialStore::from_settings(&config.credentials))
}

fn service(config: &Config, credentials: Arc<dyn CredentialStore>) -> Arc<dyn TransformService> {
    let provider = GroqProvider::with_url(credentials, config.provider.base_url.clone());
    Arc::new(LlmTransformService::new(Arc::new(provider), config.provider.clone()))
}

/// Arguments of `clarify transform`.
pub(crate) struct TransformArgs {
    pub input: PathBuf,
    pub select: String,
    pub mode: String,
    pub apply: bool,
    pub output: Option<PathBuf>,
}

/// Select, transform and optionally apply.
pub(crate) async fn handle_transform(config: &Config, args: TransformArgs) -> anyhow::Result<()> {
    let mut doc = read_page(&args.input)?;
    let Some(range) = doc.find_text(&args.select) else {
        bail!("Text not found in {}: {:?}", args.input.display(), args.select);
    };

    let mut orchestrator = Orchestrator::new(
        config,
        service(config, credentials(config)),
        Arc::new(MemoryClipboard::new()),
        Arc::new(StaticLayout::default()),
    );

    let event = InputEvent::KeyUp {
        target: EventTarget::Page(range.start().node),
    };
    match orchestrator.handle_event(&doc, Some(&range), &event) {
        TrackerDecision::ShowActions { .. } => {}
        TrackerDecision::ShowRestore { .. } => {
            bail!("Selection is inside a transformed region; run `clarify restore` first")
        }
        _ => bail!(
            "Selection must be longer than {} characters",
            config.selection.min_length
        ),
    }

    let mode = TransformMode::from_name(&args.mode);
    let Some(pending) = orchestrator.invoke(&mut doc, mode) else {
        if mode.is_local() {
            println!("Bionic reading applied.");
            return write_page(&doc, args.output.as_deref());
        }
        bail!("Nothing to transform");
    };

    let response = pending.wait().await;
    orchestrator.complete(response);
    if let Some(view) = orchestrator.result_view() {
        println!("{}", view.body.unwrap_or_default());
    }

    if orchestrator.state() != UiState::ResultSuccess {
        return Ok(());
    }
    if !args.apply {
        if args.output.is_some() {
            warn!("--output has no effect without --apply");
        }
        return Ok(());
    }

    match orchestrator.apply(&mut doc) {
        Some(_) => {
            orchestrator.done();
            match args.output.as_deref() {
                Some(path) => write_page(&doc, Some(path)),
                None => {
                    println!();
                    write_page(&doc, None)
                }
            }
        }
        None => bail!("Failed to apply the result to the page"),
    }
}

/// Restore every mutated region in `input`. Returns how many were restored.
pub(crate) fn handle_restore(input: &Path, output: Option<&Path>) -> anyhow::Result<usize> {
    let mut doc = read_page(input)?;
    let restored = MutationEngine::new().restore_all(&mut doc);
    info!(restored, "Regions restored");
    write_page(&doc, output)?;
    Ok(restored)
}

/// Answer a question about a page.
pub(crate) async fn handle_ask(config: &Config, input: &Path, question: &str) -> anyhow::Result<()> {
    let doc = read_page(input)?;
    let credentials = credentials(config);
    let assistant = PageAssistant::new(service(config, credentials.clone()), credentials);
    println!("{}", assistant.ask(&doc, question).await);
    Ok(())
}
