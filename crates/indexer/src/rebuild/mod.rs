//! Text reconstruction: raw member windows, per-process views, and export.

pub mod export;
pub mod process;
pub mod window;

pub use export::{export_archive, export_file_name};
pub use process::{process_text, render_records, ProcessText};
pub use window::{raw_window, RawWindow, WindowRequest};
