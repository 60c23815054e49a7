//! Widget toolkit abstraction for MicroGUI
//!
//! This crate provides:
//! - `WidgetToolkit` trait, the capability the engine renders through
//! - Primitive, trigger and input types shared by toolkit and engine
//! - Colors, style slots and widget state flags
//! - `HeadlessToolkit`, an in-memory toolkit for host simulation and tests
//!
//! # Architecture
//!
//! The engine never draws pixels. It creates primitives, styles them and
//! subscribes to input triggers through [`WidgetToolkit`]. A board crate
//! implements the trait on top of its graphics library and touch driver.
//! Input is delivered synchronously from [`WidgetToolkit::tick`], which the
//! engine calls from its poll loop.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod headless;
pub mod style;

// Re-export key types
pub use backend::{
    Extent, Layout, Orientation, Point, Primitive, ToolkitError, ToolkitInput, Trigger,
    WidgetHandle, WidgetToolkit,
};
pub use headless::{HeadlessToolkit, HeadlessWidget};
pub use style::{Color, ColorSlot, StateFlags};
