pub mod retrieve;
pub mod stations;

pub use retrieve::retrieve;
pub use stations::stations;
