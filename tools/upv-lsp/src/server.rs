//! LSP server: document store, debounced rescans, hint and hover serving.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, warn};

use upv_annotate::{annotate, Annotation, Settings};
use upv_scan::Span;

use crate::debounce::{DebounceState, SCAN_DELAY};
use crate::position::{offset_to_position, position_to_offset};

/// Document state tracked by the server.
struct Document {
    /// Language identifier reported by the editor on open.
    language: String,
    /// Latest full text (the server runs full-document sync).
    text: String,
    /// Annotations from the last completed scan.
    annotations: Vec<Annotation>,
    /// Rescan scheduling state.
    debounce: DebounceState,
}

/// unicode-preview language server.
pub struct PreviewServer {
    client: Client,
    documents: Arc<DashMap<Url, Document>>,
    settings: Arc<RwLock<Settings>>,
}

impl PreviewServer {
    pub fn new(client: Client) -> Self {
        PreviewServer {
            client,
            documents: Arc::new(DashMap::new()),
            settings: Arc::new(RwLock::new(Settings::default())),
        }
    }

    /// Schedule a debounced rescan for `uri`, unless one is already
    /// pending. The timer re-reads the text when it fires, so the scan
    /// always sees the newest snapshot.
    fn schedule_rescan(&self, uri: Url) {
        let should_schedule = match self.documents.get_mut(&uri) {
            Some(mut doc) => doc.debounce.request(),
            None => false,
        };
        if !should_schedule {
            return;
        }

        let documents = Arc::clone(&self.documents);
        let settings = Arc::clone(&self.settings);
        let client = self.client.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SCAN_DELAY).await;
            if let Some(mut doc) = documents.get_mut(&uri) {
                doc.debounce.fired();
            }
            rescan(&documents, &settings, &uri).await;
            let _ = client.inlay_hint_refresh().await;
        });
    }
}

/// Re-annotate one document in place.
///
/// Documents whose language is outside the allow-list get their
/// annotations cleared rather than scanned.
async fn rescan(
    documents: &DashMap<Url, Document>,
    settings: &RwLock<Settings>,
    uri: &Url,
) {
    let settings = settings.read().await;
    if let Some(mut doc) = documents.get_mut(uri) {
        if settings.applies_to(&doc.language) {
            doc.annotations = annotate(&doc.text);
            debug!("rescanned {uri}: {} annotations", doc.annotations.len());
        } else if !doc.annotations.is_empty() {
            doc.annotations.clear();
            debug!("cleared annotations for {uri} (language disabled)");
        }
    }
}

/// Extract our settings section from a configuration payload.
///
/// Accepts either the bare settings object or one nested under a
/// `unicodePreview` key. A malformed payload keeps the previous
/// settings; configuration can degrade the preview, never crash it.
fn parse_settings(value: &serde_json::Value) -> Option<Settings> {
    let section = value.get("unicodePreview").unwrap_or(value);
    if section.is_null() {
        return None;
    }
    match serde_json::from_value(section.clone()) {
        Ok(settings) => Some(settings),
        Err(error) => {
            warn!("ignoring malformed configuration: {error}");
            None
        }
    }
}

/// Strict overlap between two half-open byte ranges. A span that only
/// touches a boundary of the requested range shares no bytes with it.
fn overlaps(span: Span, start: u32, end: u32) -> bool {
    span.start < end && span.end > start
}

fn span_to_range(text: &str, span: Span) -> Range {
    Range::new(
        offset_to_position(text, span.start),
        offset_to_position(text, span.end),
    )
}

#[tower_lsp::async_trait]
impl LanguageServer for PreviewServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            if let Some(settings) = parse_settings(&options) {
                *self.settings.write().await = settings;
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                inlay_hint_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "upv-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "unicode-preview language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.insert(
            uri.clone(),
            Document {
                language: params.text_document.language_id,
                text: params.text_document.text,
                annotations: Vec::new(),
                debounce: DebounceState::Idle,
            },
        );
        // Opening (or switching to) a document scans immediately; only
        // typing is debounced.
        rescan(&self.documents, &self.settings, &uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(text) = params.content_changes.into_iter().next_back().map(|c| c.text)
        else {
            return;
        };
        if let Some(mut doc) = self.documents.get_mut(&uri) {
            doc.text = text;
        }
        self.schedule_rescan(uri);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let Some(new_settings) = parse_settings(&params.settings) else {
            return;
        };
        *self.settings.write().await = new_settings;
        debug!("configuration changed; rescanning open documents");

        let uris: Vec<Url> = self.documents.iter().map(|e| e.key().clone()).collect();
        for uri in uris {
            rescan(&self.documents, &self.settings, &uri).await;
        }
        let _ = self.client.inlay_hint_refresh().await;
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        let uri = params.text_document.uri;
        // Take the settings first so no document guard is held across
        // an await point.
        let settings = self.settings.read().await.clone();
        let Some(doc) = self.documents.get(&uri) else {
            return Ok(None);
        };

        if !settings.applies_to(&doc.language) || !settings.resolve(&doc.language).inline {
            return Ok(None);
        }

        let start = position_to_offset(&doc.text, params.range.start);
        let end = position_to_offset(&doc.text, params.range.end);

        let hints = doc
            .annotations
            .iter()
            .filter(|a| overlaps(a.span, start, end))
            .map(|a| InlayHint {
                position: offset_to_position(&doc.text, a.span.end),
                label: InlayHintLabel::String(a.text.clone()),
                kind: None,
                text_edits: None,
                tooltip: None,
                padding_left: Some(true),
                padding_right: None,
                data: None,
            })
            .collect();

        Ok(Some(hints))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let settings = self.settings.read().await.clone();
        let Some(doc) = self.documents.get(&uri) else {
            return Ok(None);
        };

        if !settings.applies_to(&doc.language) || !settings.resolve(&doc.language).hover {
            return Ok(None);
        }

        let offset = position_to_offset(&doc.text, position);
        let Some(annotation) = doc.annotations.iter().find(|a| a.span.contains(offset))
        else {
            return Ok(None);
        };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: annotation.text.clone(),
            }),
            range: Some(span_to_range(&doc.text, annotation.span)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_shared_bytes() {
        let span = Span::new(4, 8);
        assert!(overlaps(span, 0, 5));
        assert!(overlaps(span, 7, 12));
        assert!(overlaps(span, 5, 6));
        // Touching a boundary is not overlap.
        assert!(!overlaps(span, 0, 4));
        assert!(!overlaps(span, 8, 12));
    }
}
