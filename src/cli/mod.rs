mod args;
mod command;

pub use args::Cli;
pub use command::{Command, FilterArgs};

pub use args::parse;
