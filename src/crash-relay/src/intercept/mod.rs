//! Process-wide interception of unhandled failures.
//!
//! Sources (error-level log events, panics, failed supervised tasks) push
//! into one hub; consumers register with [`on_unhandled_error`].

mod console_layer;
mod hub;
pub mod panic_hook;
mod tasks;

pub use console_layer::ConsoleErrorLayer;
pub use hub::{dispatch, on_unhandled_error, subscriber_count, Handler, Subscription};
pub use tasks::spawn_supervised;
