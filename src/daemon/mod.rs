pub mod classifier;
pub mod dedup;
pub mod error;
pub mod event_loop;

pub use classifier::Classifier;
pub use dedup::DedupStore;
pub use error::DaemonError;
pub use event_loop::Daemon;
