pub mod client;
pub mod types;

pub use client::{HttpPricingClient, PricingService};
pub use types::{PricingRequest, PricingResult};
