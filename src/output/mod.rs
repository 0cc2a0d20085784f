//! Report rendering

pub mod formatter;

pub use formatter::{
    render_report, save_report_to_file, ConsoleFormatter, JsonFormatter, MarkdownFormatter,
    OutputFormatter,
};
