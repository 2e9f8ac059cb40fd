//! # gatepass
//!
//! An async client for captcha-solving services and the gatekeeper token
//! workflow built on top of them.
//!
//! ## Features
//!
//! - **Generic task poller**: submit a job to a remote solving service and
//!   poll it to a single typed outcome, with bounded submission retries,
//!   exponential backoff, a hard wall-clock timeout, and cooperative
//!   cancellation between iterations.
//! - **Turnstile solving**: builds the service's proxyless Turnstile task
//!   and extracts the solved token from the opaque solution payload.
//! - **Gatekeeper workflow**: fingerprint synthesis, token exchange against a
//!   vendor gatekeeper endpoint, and optional cart addition.
//! - **TLS fingerprinting**: uses `rquest` for Chrome-like TLS fingerprinting.
//! - **Proxy support**: HTTP and SOCKS5 proxies with authentication.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gatepass::Gatepass;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gatepass = Gatepass::builder("your_solver_api_key")
//!         .website("https://www.gameon.games/", "0x4AAAAAABww3o50PYtmz9wv")
//!         .gatekeeper(
//!             "https://gatekeeper.gameon.games/api/gatekeeper-token",
//!             "store-gameon-games.myshopify.com",
//!         )
//!         .cart_url("https://www.gameon.games/cart/add.js")
//!         .build()?;
//!
//!     let report = gatepass
//!         .run("55041037336956", Some(1), &CancellationToken::new())
//!         .await?;
//!
//!     println!("gatekeeper token: {}", report.grant.gatekeeper_token);
//!     report.save("session_data.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Using the poller directly
//!
//! The submit/poll driver is independent of the gatekeeper workflow and works
//! against any service following the createTask/getTaskResult shape:
//!
//! ```ignore
//! use gatepass::{PollerConfig, TaskPoller};
//! use tokio_util::sync::CancellationToken;
//!
//! let poller = TaskPoller::http(
//!     rquest::Client::new(),
//!     PollerConfig::new("https://api.capsolver.com", "key"),
//! );
//! let handle = poller.submit(&task_payload).await?;
//! let outcome = poller
//!     .poll_until_terminal(&handle, &CancellationToken::new())
//!     .await;
//! ```
//!
//! Tokens and signatures returned by the remote services are opaque: this
//! crate forwards them verbatim and never derives anything from them.

pub mod client;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod poller;
pub mod session;
pub mod turnstile;

// Re-exports for convenience
pub use client::{Gatepass, GatepassBuilder};
pub use error::{GatepassError, PollError, Result, SubmissionError, TransportError};
pub use poller::{PollOutcome, PollerConfig, TaskHandle, TaskPoller};
pub use session::SessionReport;
pub use turnstile::TurnstileSolver;
