//! Warband - army combat resolution for a turn-based strategy game

pub mod battle;
pub mod catalog;
pub mod combat;
pub mod core;
pub mod roster;
