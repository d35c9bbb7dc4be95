// Oakbot - Northeastern University student assistant
// Library exports

pub mod config;
pub mod conversation;
pub mod delegate;
pub mod errors;
pub mod providers; // Completion API clients
pub mod router;
pub mod server; // HTTP surface and sessions
