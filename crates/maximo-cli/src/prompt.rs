pub mod cliclack;
pub mod prompt;
