//! HTTP boundary: request handlers and JSON body shapes.
//!
//! Everything here is a thin adapter over the link service; no invariant is
//! enforced at this layer.

pub mod dto;
pub mod handlers;
