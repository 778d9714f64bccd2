//! Zebulon listings: fetch the venue's event page in a headless browser,
//! pull the embedded `__NEXT_DATA__` payload, and rewrite it as a
//! schema.org JSON-LD `@graph`.
//!
//! The browser sits behind the [`renderer::Renderer`] trait so the retry
//! loop and the whole pipeline can be driven without Chromium.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod renderer;
