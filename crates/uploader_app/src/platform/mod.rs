mod app;
mod args;
mod effects;
mod input;
mod logging;
mod surface;

pub use app::run_app;
