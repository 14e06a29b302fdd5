//! Write systems to disk.

use error::Result;

use polycrys::system::Polycrystal;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output a system to disk as a LAMMPS data file with atom style 'atomic'.
///
/// # Errors
/// Returns an error if the file could not be written to.
pub fn write_lammps(system: &Polycrystal, path: &Path, title: &str, masses: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_data(&mut writer, system, title, masses)?;
    writer.flush()?;

    Ok(())
}

/// Write the data file contents. A 'Masses' section is added if masses
/// are given, one for every species.
fn write_data<W: Write>(writer: &mut W, system: &Polycrystal, title: &str, masses: &[f64])
        -> Result<()> {
    let num_types = system.num_species().max(masses.len());

    writer.write_fmt(format_args!("# {}\n\n", title))?;
    writer.write_fmt(format_args!("{} atoms\n", system.num_atoms()))?;
    writer.write_fmt(format_args!("{} atom types\n\n", num_types))?;

    for (&(lo, hi), dim) in system.simbox().bounds().iter().zip(["x", "y", "z"].iter()) {
        writer.write_fmt(format_args!("{:.6} {:.6} {}lo {}hi\n", lo, hi, dim, dim))?;
    }

    if !masses.is_empty() {
        writer.write_fmt(format_args!("\nMasses\n\n"))?;

        for (i, mass) in masses.iter().enumerate() {
            writer.write_fmt(format_args!("{} {}\n", i + 1, mass))?;
        }
    }

    writer.write_fmt(format_args!("\nAtoms # atomic\n\n"))?;

    for atom in system.iter_atoms() {
        let (x, y, z) = atom.position.to_tuple();
        writer.write_fmt(format_args!("{} {} {:.6} {:.6} {:.6}\n",
                                      atom.index + 1, atom.species, x, y, z))?;
    }

    Ok(())
}
