//! tick_snake - an authoritative Snake game-state engine
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - A shared engine handle and periodic tick driver (session module)
//! - Keyboard and text-command input mapping (input module)
//! - Terminal rendering of snapshots (render module)
//! - Human (TUI) and headless (JSON lines) front ends (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
