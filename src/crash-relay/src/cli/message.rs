//! One-line status output of the `crash-relay` commands. Failures are not
//! printed here, they leave `main` as `anyhow` reports.
use colored::{ColoredString, Colorize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Info,
}

impl Status {
    fn label(self) -> ColoredString {
        match self {
            Status::Success => "[relayed]".green().bold(),
            Status::Warning => "[warning]".yellow().bold(),
            Status::Info => "   [info]".cyan().bold(),
        }
    }
}

pub fn status_line(status: Status, message: impl Display) -> String {
    format!("{} {}", status.label(), message)
}

#[macro_export]
macro_rules! success_message {
    ($($arg:tt)*) => {
        println!("{}", $crate::cli::message::status_line($crate::cli::message::Status::Success, format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! warning_message {
    ($($arg:tt)*) => {
        println!("{}", $crate::cli::message::status_line($crate::cli::message::Status::Warning, format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! info_message {
    ($($arg:tt)*) => {
        println!("{}", $crate::cli::message::status_line($crate::cli::message::Status::Info, format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Status::Success, "[relayed] sent")]
    #[case(Status::Warning, "[warning] sent")]
    #[case(Status::Info, "   [info] sent")]
    fn test_status_line(#[case] status: Status, #[case] expected: &str) {
        colored::control::set_override(false);
        assert_eq!(status_line(status, "sent"), expected);
    }
}
