// Providers layer - clocks and token crypto
pub mod clock;
pub mod token_provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token_provider::TokenProvider;
