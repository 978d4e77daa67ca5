//! Channel Analytics
//!
//! Per-channel view summaries for the dashboard:
//!
//! - **Types**: linked channels, monthly view records, calendar months
//! - **Aggregator**: pure fold of view history into channel summaries
//! - **Selection**: which channel is shown in detail
//! - **Service**: one dashboard load against the gateway
//!
//! # Example
//!
//! ```rust
//! use creatordash::analytics::{aggregate, Month, MonthlyViewRecord};
//!
//! let url = "https://www.youtube.com/@creator";
//! let records = vec![
//!     MonthlyViewRecord::new(url, Month::new(2025, 2).unwrap(), 150),
//!     MonthlyViewRecord::new(url, Month::new(2025, 1).unwrap(), 100),
//! ];
//!
//! let channels = aggregate(&[url], &records).unwrap();
//! assert_eq!(channels[0].views, 250);
//! assert_eq!(channels[0].growth, 50.0);
//! ```

mod aggregator;
mod error;
mod selection;
mod service;
mod types;

pub use aggregator::{aggregate, growth_percent};
pub use error::{AnalyticsError, AnalyticsResult};
pub use selection::SelectionState;
pub use service::AnalyticsService;
pub use types::{display_name, LinkedChannel, Month, MonthlyViewRecord, ParseMonthError};
