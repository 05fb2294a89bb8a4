//! Pure data types: orders, addresses, recipes and the address validator.

pub mod order;
pub mod recipe;
pub mod validator;

pub use order::*;
pub use recipe::*;
pub use validator::*;
