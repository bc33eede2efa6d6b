mod demo;
mod root;

pub use root::Cli;
