//! Dine server - restaurant ordering backend
//!
//! Customers browse the menu, fill a cart and place it at a table; staff run
//! tables, move orders through the kitchen and settle them at the till.
//!
//! # Module layout
//!
//! ```text
//! dine-server/src/
//! ├── core/          # config, state, errors, HTTP server
//! ├── auth/          # JWT, argon2 passwords, principals, rate limiting
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── orders/        # order/table coordinator (state machine)
//! ├── services/      # notifications, OTP reset, invoices, feedback
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::JwtService;
pub use core::{Config, Server, ServerState, build_app};
pub use orders::OrdersManager;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured fields under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  _
   / __ \(_)___  ___
  / / / / / __ \/ _ \
 / /_/ / / / / /  __/
/_____/_/_/ /_/\___/
    "#
    );
}
