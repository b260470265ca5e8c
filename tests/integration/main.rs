//! Integration tests: full sessions driven through the public API.

mod recording_observer;
mod replay;
mod session_flow;
