//! Turbolight Hardware Abstraction Layer
//!
//! This crate defines the capabilities the display driver needs from the
//! board. Nothing here knows about pins by number or registers by address:
//! a board crate (or an `embedded-hal` implementation wrapped in one of the
//! adapters below) provides them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  turbolight-driver (framebuffer, flush) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  turbolight-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  host mocks   │
//! │  pins / delay │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalOutputLine`] - A bus line with direction control
//! - [`delay::PrecisionDelay`] - Microsecond busy-wait
//! - [`i2c::TwoWireBus`] - Write-only two-wire bus transactions
//! - [`uart::UartRx`] - Non-blocking byte source

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use delay::{HalDelay, NoDelay, PrecisionDelay};
pub use gpio::{DigitalOutputLine, OpenDrainLine};
pub use i2c::{BusTiming, TwoWireBus};
pub use uart::{IoRx, UartRx};
