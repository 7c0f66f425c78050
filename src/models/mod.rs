pub mod account;
pub mod ingestion;
pub mod media;
pub mod note;
pub mod preferences;
pub mod schedule;
pub mod task;
pub mod wire;
