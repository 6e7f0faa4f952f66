//! Flutter bridge for the organiser core.

pub mod api;
