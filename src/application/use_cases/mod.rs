pub mod extract;
pub mod file_loader;
