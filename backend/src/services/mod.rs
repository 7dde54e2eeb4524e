//! Service layer: sky computations and the window search built on them.
//!
//! Everything here is pure and synchronous; the scheduler consumes the
//! accepted windows produced by [`windows::discover_windows`].

pub mod astronomical_night;
pub mod ephemeris;
pub mod visibility;
pub mod windows;

pub use astronomical_night::{planning_horizon, HorizonMode, ASTRONOMICAL_TWILIGHT};
pub use ephemeris::{AstroEphemeris, Ephemeris, EquatorialPosition, Twilight};
pub use visibility::{is_visible, Visibility};
pub use windows::{discover_windows, find_window, find_windows, AcceptedWindow, WindowPolicy};
