//! Flutter-facing bindings for `fellowships_core`.

pub mod api;
