//! Construct polycrystalline systems for use in molecular dynamics simulations.
//!
//! A periodic box is divided into grains around randomly placed centers. Every
//! grain is filled with a randomly rotated crystal, by default the two sublattices
//! of diamond cubic silicon, and an atom is kept only by the grain whose center
//! (or periodic image of it) is closest.

#[macro_use]
extern crate log;
extern crate rand;
extern crate rayon;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
extern crate serde_json;

pub mod classify;
pub mod coord;
pub mod error;
pub mod fill;
pub mod grain;
pub mod lattice;
pub mod prune;
pub mod rotation;
pub mod system;
