// Instruction module for the mint guard
// Entry points operating on a guard account: setup, update, mint and route

pub mod initialize;
pub mod mint;
pub mod route;
pub mod update;

pub use initialize::*;
pub use mint::*;
pub use route::*;
pub use update::*;
