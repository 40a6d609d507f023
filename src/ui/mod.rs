/// egui views over a [`crate::state::Session`].
pub mod panels;
pub mod plot;
pub mod report;
pub mod tables;
