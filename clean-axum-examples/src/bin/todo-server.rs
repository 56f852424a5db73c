//! Example: todo list server
//!
//! Run with: RUST_LOG=clean_axum=debug,info cargo run --bin todo-server
//! Test with:
//!   curl -i -X POST http://localhost:3000/todos \
//!     -H 'Content-Type: application/json' \
//!     -d '{"title": "New todo title"}'
//!
//!   curl -i http://localhost:3000/todos/42

use clean_axum_examples::{REQUEST_TIMEOUT, TodoStore, response_config, router, server_addr};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = router(TodoStore::new(), response_config(), REQUEST_TIMEOUT);

    let addr = server_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "todo server listening");

    println!("=== Example: Todo list ===");
    println!("Server listening on http://{}", addr);
    println!();
    println!("Create a todo (201):");
    println!("  curl -i -X POST http://localhost:3000/todos \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"title\": \"New todo title\"}}'");
    println!();
    println!("Create one from XML (201):");
    println!("  curl -i -X POST http://localhost:3000/xml/todos \\");
    println!("    -H 'Content-Type: application/xml' \\");
    println!("    -d '<CreateTodo><title>Walk the dog</title></CreateTodo>'");
    println!();
    println!("Empty title (422):");
    println!("  curl -i -X POST http://localhost:3000/todos -d '{{\"title\": \"\"}}'");
    println!();
    println!("Fetch it back:");
    println!("  curl -i http://localhost:3000/todos/42");

    axum::serve(listener, app).await?;
    Ok(())
}
