#![cfg_attr(not(test), no_std)]
#[cfg(feature = "alloc")]
extern crate alloc;

mod error;
mod spritz;
mod state;

pub use crate::error::Error;
pub use crate::spritz::Spritz;
pub use crate::state::{ABSORB_CAPACITY, N};
