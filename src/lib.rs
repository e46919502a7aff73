pub mod app;
pub mod calendar;
pub mod config;
pub mod date_key;
pub mod errors;
pub mod handlers;
pub mod import;
pub mod models;
pub mod mood;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use app::router;
pub use config::Config;
pub use date_key::DateKey;
pub use errors::{ImportError, StorageError};
pub use mood::MoodGrade;
pub use state::AppState;
pub use storage::{Backend, FileBackend, MemoryBackend, Record};
pub use store::EntryStore;
