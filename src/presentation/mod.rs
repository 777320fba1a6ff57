// プレゼンテーション層 - レポートと進捗表示の整形

pub mod report;

pub use report::{
    format_profile, format_progress, format_summary, render, render_json_lines,
    render_text_report, runtime_header, OutputFormat,
};
