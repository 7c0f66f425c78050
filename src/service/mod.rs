pub mod api_service;
pub mod feedback;
pub mod session_store;
pub mod upload;
