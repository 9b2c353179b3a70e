pub mod config;
pub mod dispatch;
pub mod models;
pub mod orchestration;
pub mod reports;
pub mod scope;

// Re-export commonly used types for convenience.
pub use config::AppConfig;
pub use dispatch::{HttpDispatcher, RequestDispatcher};
pub use orchestration::{JobDescriptor, ReportOrchestrator};
pub use scope::ScopeDraft;
