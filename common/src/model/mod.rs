pub mod attraction;
pub mod merge;
