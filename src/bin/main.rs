//! Create polycrystalline silicon for use in molecular dynamics simulations.
//!
//! # Usage
//! ```
//! USAGE:
//!     polycrys [FLAGS] [OPTIONS] <output>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!         --redraw     Redraw the grain centers if two of them coincide
//!     -V, --version    Prints version information
//!     -v, --verbose    Print information about every grain image
//!
//! OPTIONS:
//!         --cells <cells> <cells> <cells>         Number of unit cells along x, y and z
//!     -c, --config <config>                       Read the run configuration from a JSON file
//!     -a, --lattice-constant <lattice_constant>   Lattice constant of the cubic unit cell (Å)
//!     -l, --length <length>                       Box edge length (Å)
//!     -n, --grains <num_grains>                   Number of grains
//!         --prune <prune>                         Remove atoms closer than this distance (Å)
//!     -s, --seed <seed>                           Seed for the random number generator
//!     -t, --title <title>                         Title written to the output file
//!
//! ARGS:
//!     <output>    Output LAMMPS data file
//! ```
//!
//! # Configuration file
//! A JSON file with any of the fields `title`, `lattice_constant`, `size`
//! (`{"length": 250.0}` or `{"cells": {"nx": 4, "ny": 4, "nz": 4}}`), `num_grains`,
//! `bases` (a list of fractional coordinate lists, one per species), `masses`,
//! `seed`, `redraw_degenerate` and `prune_distance`. Command line options take
//! precedence over the file.
//!
//! # Logging
//! Progress is logged to stderr. Set `RUST_LOG` to change the level, eg.
//! `RUST_LOG=debug` to see the number of atoms kept for every grain image.

extern crate colored;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate polycrys;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[macro_use]
extern crate structopt;

mod config;
mod error;
mod output;

use config::{Args, Config};

use env_logger::Env;
use structopt::StructOpt;

use std::process;

fn main() {
    let args = Args::from_args();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Err(err) = Config::from_args(args).and_then(|conf| conf.run()) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
