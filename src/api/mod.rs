pub mod admin;
pub mod pages;
