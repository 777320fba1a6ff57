// レポートの永続化

pub mod writer;

pub use writer::{
    write_with_fallback, write_with_fallback_to, ConsoleReportWriter, FileReportWriter,
    MemoryReportWriter, ReportWriter, WriteTarget,
};
