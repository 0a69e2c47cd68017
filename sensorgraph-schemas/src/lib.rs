pub mod file_formats;
pub mod merged;
pub mod reading;
pub mod report;
