//! unicode-preview language server.
//!
//! Decodes `\NNN`, `\xHH`, `\uHHHH`, and `\u{H+}` escapes in open
//! documents and serves the decoded characters as inlay hints and
//! hovers. Speaks LSP over stdio.

mod debounce;
mod position;
mod server;

use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the LSP transport; logs must go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(server::PreviewServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
