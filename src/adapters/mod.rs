// Adapters layer: concrete implementations for the network, the response cache and output.

pub mod cache;
pub mod http;
pub mod output;
