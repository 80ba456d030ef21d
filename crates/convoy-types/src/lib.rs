pub mod agent;
pub mod config;
pub mod error;
pub mod interaction;
pub mod opinion;

pub use agent::*;
pub use config::*;
pub use error::*;
pub use interaction::*;
pub use opinion::*;
