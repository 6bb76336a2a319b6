//! Built-in condition providers.

pub mod manual_feed;
pub mod static_feed;

pub use manual_feed::ManualFeed;
pub use static_feed::StaticFeed;
