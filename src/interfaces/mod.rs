//! Edges between an HTTP host and the handler: query parsing and redirect rendering.

pub mod redirect;
