//! Flutter bridge for the study cards core.

pub mod api;
