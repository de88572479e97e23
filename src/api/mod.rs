mod client;
mod time;
mod types;

pub use client::JiraClient;
pub use time::{started_timestamp, TimeSpent};
pub use types::*;
