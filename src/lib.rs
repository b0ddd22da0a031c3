pub mod app;
pub mod canvas;
pub mod history;
pub mod io;
pub mod logger;
pub mod palette;
