mod app;
mod args;
mod effects;
mod form_file;
mod ui;

pub use app::run_app;
