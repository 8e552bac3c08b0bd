pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::build_router;
pub use cgo_suggest::Engine;
pub use state::{engine_from_config, ServerState};
