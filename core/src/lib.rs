pub mod catalog;
pub mod error;
pub mod favorites;
pub mod toggle;
pub mod view;
