// Topicscope: topic modeling for free-text survey responses
//
// This is the library root. Each module corresponds to a stage of the
// analysis pipeline, plus the HTTP surface that drives it.

pub mod config;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod store;
pub mod text;
pub mod web;
