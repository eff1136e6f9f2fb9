//! `taskboard`: terminal kanban client with optimistic drag-and-drop.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod notify;
pub mod runtime;
pub mod ui;
