//! The gateway URL grammar.
//!
//! A request path is a mini-language: an optional signature or `unsafe/`
//! prefix, a run of transformation segments in a fixed canonical order,
//! and a source image tail that may itself contain slashes and colons.
//! This module owns both directions of that mapping plus the two helpers
//! around it:
//!
//! - [`parse`]: path string to [`Params`], total.
//! - [`generate_path`] / [`generate`] / [`generate_unsafe`]: [`Params`] to
//!   canonical path, optionally signed or marked unsafe.
//! - [`sign`]: HMAC-SHA1 path signature, URL-safe base64.
//! - [`normalize`]: free user URL to an escaped, slash-collapsed path.
//!
//! Everything here is a pure function: no shared state, no I/O, safe to
//! call from any number of concurrent requests.

pub mod generate;
pub mod normalize;
pub mod params;
pub mod parse;
pub mod sign;

pub use generate::{generate, generate_path, generate_unsafe};
pub use normalize::{default_escape_byte, normalize};
pub use params::{Filter, HAlign, Params, TrimBy, VAlign};
pub use parse::parse;
pub use sign::{constant_time_compare, sign};
