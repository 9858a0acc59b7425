pub mod calculator;
pub mod heikin_ashi;
pub mod oscillators;
pub mod overlaps;
pub mod series;
