// Adapters layer: concrete implementations of the domain ports.

pub mod browser;
pub mod catalog;
pub mod dom;
pub mod http;
pub mod sink;
