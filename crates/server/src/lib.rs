pub mod routes;
pub mod startup;
pub mod errors;

pub use startup::{bind, build_app, run, serve};
