//! Sentiment140 for interpretability tooling: load a split from a local
//! catalog, normalize it to binary labels, and serve it next to a pretrained
//! classifier.

pub mod app;
pub mod config;
pub mod data;
pub mod model;
pub mod server;
