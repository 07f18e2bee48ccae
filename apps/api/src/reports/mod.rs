pub mod export;
pub mod handlers;
pub mod summary;
pub mod validation;
pub mod week;
