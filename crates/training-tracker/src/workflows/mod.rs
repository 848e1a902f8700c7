pub mod roster;
pub mod training;
