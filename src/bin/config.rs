//! Configure and run the program.

use error::{PolycrysCliError, Result};
use output::write_lammps;

use polycrys::fill::{create_polycrystal, GenerationConf};
use polycrys::grain::Sampler;
use polycrys::lattice::{Basis, Cells};
use polycrys::prune::prune_overlaps;

use rand::{Rng, SeedableRng, StdRng};
use serde_json;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(StructOpt, Debug)]
#[structopt(name = "polycrys")]
/// Create a polycrystalline diamond cubic system and write it as a LAMMPS data file.
///
/// Values which are not given on the command line are read from the optional
/// configuration file, or set to their defaults.
pub struct Args {
    #[structopt(parse(from_os_str))]
    /// Output LAMMPS data file
    pub output: PathBuf,

    #[structopt(short = "c", long = "config", parse(from_os_str))]
    /// Read the run configuration from a JSON file
    pub config: Option<PathBuf>,

    #[structopt(short = "n", long = "grains")]
    /// Number of grains
    pub num_grains: Option<usize>,

    #[structopt(short = "a", long = "lattice-constant")]
    /// Lattice constant of the cubic unit cell (Å)
    pub lattice_constant: Option<f64>,

    #[structopt(short = "l", long = "length")]
    /// Box edge length (Å), rounded up to a whole number of unit cells
    pub length: Option<f64>,

    #[structopt(long = "cells", raw(number_of_values = "3"))]
    /// Number of unit cells along x, y and z
    pub cells: Vec<u64>,

    #[structopt(short = "s", long = "seed")]
    /// Seed for the random number generator
    pub seed: Option<u64>,

    #[structopt(long = "redraw")]
    /// Redraw the grain centers if two of them coincide
    pub redraw: bool,

    #[structopt(long = "prune")]
    /// Remove atoms which are closer than this distance to another atom (Å)
    pub prune: Option<f64>,

    #[structopt(short = "t", long = "title")]
    /// Title written to the output file
    pub title: Option<String>,

    #[structopt(short = "v", long = "verbose")]
    /// Print information about every grain image
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
/// Size of the box, either as an edge length or as a number of unit cells.
pub enum BoxSize {
    Length(f64),
    Cells(Cells),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
/// The program run configuration.
pub struct Config {
    /// Title of output system.
    pub title: String,
    /// Lattice constant (Å).
    pub lattice_constant: f64,
    /// Size of the box.
    pub size: BoxSize,
    /// Number of grains.
    pub num_grains: usize,
    /// Sublattices of the unit cell, one per species.
    pub bases: Vec<Basis>,
    /// Masses of the species, in the same order as the bases. Optional.
    pub masses: Vec<f64>,
    /// Seed for the random number generator. A seed is drawn if not set.
    pub seed: Option<u64>,
    /// Redraw grain centers which coincide.
    pub redraw_degenerate: bool,
    /// Remove overlapping atoms closer than this distance (Å).
    pub prune_distance: Option<f64>,
    #[serde(skip)]
    /// Path of output file.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            title: "Polycrystalline Si - Voronoi method".to_string(),
            lattice_constant: 5.403,
            size: BoxSize::Length(250.0),
            num_grains: 4,
            bases: Basis::diamond(),
            masses: vec![28.0855, 28.0855],
            seed: None,
            redraw_degenerate: false,
            prune_distance: None,
            output: PathBuf::new(),
        }
    }
}

impl Config {
    /// Read the configuration file if one was given and override its values
    /// with the command line arguments.
    ///
    /// # Errors
    /// Returns an error if the configuration file could not be read or parsed,
    /// or if the resulting configuration is inconsistent.
    pub fn from_args(args: Args) -> Result<Config> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(title) = args.title {
            config.title = title;
        }
        if let Some(a) = args.lattice_constant {
            config.lattice_constant = a;
        }
        if let Some(n) = args.num_grains {
            config.num_grains = n;
        }
        if let Some(length) = args.length {
            config.size = BoxSize::Length(length);
        }
        if !args.cells.is_empty() {
            config.size = BoxSize::Cells(Cells::new(args.cells[0], args.cells[1], args.cells[2]));
        }
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        if args.prune.is_some() {
            config.prune_distance = args.prune;
        }
        config.redraw_degenerate |= args.redraw;
        config.output = args.output;

        config.validate()?;

        Ok(config)
    }

    /// Read a configuration from a JSON file. Missing values are set to their defaults.
    pub fn from_file(path: &Path) -> Result<Config> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        Ok(serde_json::from_reader(reader)?)
    }

    fn validate(&self) -> Result<()> {
        if !self.masses.is_empty() && self.masses.len() != self.bases.len() {
            return Err(PolycrysCliError::ConfigError(format!(
                "{} masses were given for {} bases", self.masses.len(), self.bases.len()
            )));
        }

        if self.output.as_os_str().is_empty() {
            return Err(PolycrysCliError::ConfigError("no output file was given".to_string()));
        }

        Ok(())
    }

    /// The crystal configuration of the run.
    pub fn generation_conf(&self) -> Result<GenerationConf> {
        let cells = match self.size {
            BoxSize::Length(length) => Cells::from_length(self.lattice_constant, length)?,
            BoxSize::Cells(cells) => cells,
        };

        Ok(GenerationConf {
            lattice_constant: self.lattice_constant,
            cells,
            bases: self.bases.clone(),
        })
    }

    /// Run the program.
    ///
    /// # Errors
    /// Returns an error if the system couldn't be constructed or written to disk.
    pub fn run(&self) -> Result<()> {
        let conf = self.generation_conf()?;
        let sampler = Sampler {
            num_grains: self.num_grains,
            redraw_degenerate: self.redraw_degenerate,
        };

        let seed = self.seed.unwrap_or_else(|| ::rand::thread_rng().gen::<u64>());
        info!("Using random seed {}", seed);

        let seed_slice: &[usize] = &[seed as usize];
        let mut rng = StdRng::from_seed(seed_slice);

        let mut system = create_polycrystal(&conf, &sampler, &mut rng)?;

        if let Some(min_distance) = self.prune_distance {
            prune_overlaps(&mut system, min_distance)?;
        }

        write_lammps(&system, &self.output, &self.title, &self.masses)?;
        info!("Wrote {} atoms to '{}'", system.num_atoms(), self.output.display());

        Ok(())
    }
}
