//! # Creatordash
//!
//! Backend for a creator-platform dashboard: channel analytics, payout
//! summary and contract agreements, read from and written to a hosted
//! backend-as-a-service.
//!
//! ## Modules
//!
//! - [`analytics`]: Channel aggregation and selection
//! - [`gateway`]: Backend access (REST and in-memory)
//! - [`payout`]: Balance and payout schedule
//! - [`contract`]: Contract agreement form
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use creatordash::analytics::AnalyticsService;
//! use creatordash::gateway::{InMemoryGateway, UserId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = AnalyticsService::new(Arc::new(InMemoryGateway::demo()));
//!     let user = UserId::new("demo").ok_or("blank user id")?;
//!
//!     for channel in service.load(&user).await? {
//!         println!("{}: {} views ({:+.1}%)", channel.display_name, channel.monthly_views, channel.growth);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod contract;
pub mod gateway;
pub mod payout;

// Re-export top-level types for convenience
pub use analytics::{
    aggregate, AnalyticsError, AnalyticsResult, AnalyticsService, LinkedChannel, Month,
    MonthlyViewRecord, SelectionState,
};

pub use gateway::{Gateway, GatewayError, InMemoryGateway, RestGateway, UserId};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, GatewayConfig, LoggingConfig, PayoutConfig};

pub use contract::{ContractError, ContractReceipt, ContractSubmission, Signature};

pub use payout::PayoutSummary;
