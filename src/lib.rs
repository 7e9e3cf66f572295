//! Finds every way to pick one meeting-time option per class so that no
//! two chosen options share a weekly time slot.

pub mod display;
pub mod parser;
pub mod schedule;
pub mod web;
