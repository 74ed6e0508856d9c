pub mod admin;
pub mod authentication;
pub mod token;

pub use admin::*;
pub use authentication::*;
pub use token::*;
