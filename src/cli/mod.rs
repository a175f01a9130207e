//! CLI command implementations.
//!
//! Each submodule implements one `httplog` command as a function that returns
//! its output, so the binary only parses arguments and prints.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mask` | Mask a JSON body, form body or URI read from a file or stdin |
//! | `render` | Render the log blocks of a recorded exchange |
//! | `config show` | Print the effective configuration as TOML |
//! | `id` | Print a fresh correlation ID |
//!
//! # Example Usage
//!
//! ```bash
//! # Mask a JSON body
//! echo '{"password":"hunter2"}' | httplog mask json --field password
//!
//! # Render a recorded exchange and write it through the logger
//! httplog render --exchange exchange.json --emit
//!
//! # Inspect configuration after file and environment overrides
//! HTTPLOG_LEVEL=debug httplog config show
//! ```

mod config;
mod mask;
mod render;

pub use config::show_config;
pub use mask::{MaskKind, mask_text};
pub use render::{Exchange, RecordedMessage, render_exchange};
