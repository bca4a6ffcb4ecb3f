pub mod pages;
pub mod session;
pub mod system;
pub mod ui;
