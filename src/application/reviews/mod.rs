//! Reviews and the restaurant rating aggregate

pub mod service;

pub use service::ReviewService;
