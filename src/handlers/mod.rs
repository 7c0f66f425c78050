pub mod account;
pub mod dashboard;
pub mod home;
pub mod ingest;
pub mod notes;
pub mod schedule_view;
pub mod task_list;
