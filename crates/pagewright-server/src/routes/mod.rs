pub mod pages;
pub mod sections;
