//! HTTP contract types for the Taskboard client.
//!
//! JSON shapes of the task backend: tasks, projects, request bodies,
//! `{ data }` envelopes and error bodies.

pub mod envelope;
pub mod project;
pub mod task;
