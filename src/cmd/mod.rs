pub mod progress;
pub mod publish;
pub mod report;
