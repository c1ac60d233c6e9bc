pub mod client;
pub mod types;

pub use client::MalinaClient;
pub use types::{DeviceTarget, FieldError, StatusRecord};
