use csstoken_lsp::CssTokenLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    csstoken::logging::init_tracing();
    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) = LspService::new(CssTokenLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
