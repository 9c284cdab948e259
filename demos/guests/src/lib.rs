//! Demo guests for the ECS bridge host.
//!
//! - [`simple_guest`] registers two components and prints the first one.
//! - [`boa_guest`] spawns one `Boa` and reads it back through system `s`.
//! - [`motion_guest`] accelerates and prints velocities, writing through the
//!   host each tick.

mod boa;
mod motion;
mod simple;

pub use boa::{BOA_SYSTEM, boa_guest};
pub use motion::{ACCELERATE_SYSTEM, ACCELERATION, PRINT_VELOCITY_SYSTEM, SPAWN_SYSTEM, motion_guest};
pub use simple::{PRINT_FIRST_SYSTEM, simple_guest};

/// Build a demo guest by name.
#[must_use]
pub fn by_name(name: &str) -> Option<bridge_guest::GuestModule> {
    match name {
        "simple" => Some(simple_guest()),
        "boa" => Some(boa_guest()),
        "motion" => Some(motion_guest()),
        _ => None,
    }
}
