//! Example: fetching a gatekeeper token behind a Turnstile challenge.
//!
//! Run with: cargo run --example fetch_token

use gatepass::Gatepass;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output (optional)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let client_key =
        std::env::var("SOLVER_API_KEY").expect("set SOLVER_API_KEY to your solving service key");

    let gatepass = Gatepass::builder(client_key)
        .website("https://www.gameon.games/", "0x4AAAAAABww3o50PYtmz9wv")
        .gatekeeper(
            "https://gatekeeper.gameon.games/api/gatekeeper-token",
            "store-gameon-games.myshopify.com",
        )
        .cart_url("https://www.gameon.games/cart/add.js")
        // Optionally add proxy:
        // .proxy("http://127.0.0.1:8080")
        .build()?;

    // Ctrl-C stops the poll loop between iterations.
    let cancel = CancellationToken::new();
    let ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc.cancel();
        }
    });

    let variant_id = "55041037336956";
    match gatepass.run(variant_id, Some(1), &cancel).await {
        Ok(report) => {
            println!("Success!");
            println!("  fingerprint: {}", report.fingerprint);
            println!(
                "  gatekeeper_token: {}...",
                &report.grant.gatekeeper_token
                    [..50.min(report.grant.gatekeeper_token.len())]
            );
            if let Some(cart) = &report.cart {
                println!("  cart items: {}", cart.items.len());
            }
            report.save("session_data.json")?;
            println!("  session saved to session_data.json");
        }
        Err(e) => {
            println!("Failed: {}", e);
        }
    }

    Ok(())
}
