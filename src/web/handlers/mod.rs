pub mod cafes;
pub mod pages;
