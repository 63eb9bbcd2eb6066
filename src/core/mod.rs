// src/core/mod.rs

// The scan session lifecycle: everything below is independent of the
// terminal UI and is driven only through `controller::SessionController`.

/// Catalog, configuration, session and wire types.
pub mod models;

/// The error taxonomy surfaced in the controller's error slot.
pub mod error;

/// HTTP access to the backend and stream address derivation.
pub mod client;

/// Concurrent, fail-fast loading of the option catalog.
pub mod catalog;

/// The four-step configuration state machine.
pub mod wizard;

/// The launch gate and session-creation request.
pub mod launcher;

/// The live output channel and its buffer.
pub mod relay;

/// Owns all of the above and applies asynchronous completions.
pub mod controller;
