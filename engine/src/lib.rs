pub mod types;
pub mod grid;
pub mod pathing;
pub mod input;
pub mod output;
pub mod setup;

#[cfg(test)]
mod tests;

pub use types::*;
pub use grid::Board;
pub use pathing::AttackPath;
