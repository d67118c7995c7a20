//! Line-oriented operator console standing in for the sensor feed and UI.

mod command;
mod console_reader;

pub use command::ConsoleCommand;
pub use console_reader::ConsoleReader;
