pub mod account;
pub mod code;
pub mod session;
pub mod token;
