pub mod extract;
pub mod fields;
pub mod handlers;
