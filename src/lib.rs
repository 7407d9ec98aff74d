pub mod app;
pub mod canvas;
pub mod controller;
pub mod eval;
pub mod logging;
pub mod overlay;
pub mod settings;
