//! Price-quote calculator for real-estate diagnostic services.
//!
//! The [`pricing`] module holds the engine that turns a [`pricing::QuoteRequest`]
//! into an itemized [`pricing::QuoteResult`]; [`presentation`] turns that result
//! into something a person or a quote template can consume.

pub mod config;
pub mod error;
pub mod presentation;
pub mod pricing;
pub mod telemetry;
