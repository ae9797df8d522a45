//! Answer-provider implementations for the Intelix engine.
//!
//! The engine only sees the [`intelix_core::AnswerProvider`] trait; these
//! implementations own transport, timeouts, and response parsing. Every
//! failure surfaces as an `Err`, which the engine collapses to "no
//! answer".

mod http;
mod scrape;

pub use http::{HttpAnswerProvider, ProviderMode};
pub use scrape::ScrapeAnswerProvider;
