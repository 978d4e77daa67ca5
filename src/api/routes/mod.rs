//! API Routes
//!
//! Route handlers organized by functionality.

pub mod channels;
pub mod contract;
pub mod health;
pub mod payout;
pub mod statistics;
