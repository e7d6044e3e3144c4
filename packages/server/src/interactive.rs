//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use std::sync::Arc;

use dialoguer::{Confirm, Input};
use engagement_map_dashboard::Dashboard;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address and port, then delegates to
/// [`super::run_server_at`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(dashboard: Arc<Dashboard>) -> std::io::Result<()> {
    println!("Engagement Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .unwrap_or(8080);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server_at(dashboard, bind_addr, port).await
}
