//! Hardware-independent extended widget runtime for slate
//!
//! This crate contains the touch-driven widget layer that sits on top of a
//! small element/page model: gauges, checkboxes and radio groups, sliders, and
//! the compound numeric stepper, together with the redraw policy that decides
//! how much of each widget must be repainted after a state change.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod framebuffer;
pub mod input;
pub mod snapshot;
pub mod store;
pub mod ui;
pub mod widgets;
