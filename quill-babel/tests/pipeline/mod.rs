//! End to end tests through the public entry points

mod classify;
mod fallback;
mod properties;
mod round_trip;
