mod check;
mod send;

pub use check::check;
pub use send::send;
