mod yahoo;

pub use yahoo::{YahooConfig, YahooProvider};
