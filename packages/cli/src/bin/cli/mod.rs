pub mod access;
pub mod account;
pub mod guest;
pub mod plants;
