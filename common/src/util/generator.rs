use crate::db::parser::tileconn::TileConnEntry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes a random but well-formed benchmark: a grid file with `num_tile_types`
/// tile types scattered over `width x height`, and a tileconn JSON listing
/// east and north connectivity between every ordered pair of tile types.
/// The same `seed` always yields the same files.
pub fn generate_random_device(
    grid_file: &str,
    tileconn_file: &str,
    width: u32,
    height: u32,
    num_tile_types: usize,
    max_wires: usize,
    seed: u64,
) -> std::io::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let num_tile_types = num_tile_types.max(1);
    let tile_names: Vec<String> = (0..num_tile_types).map(|i| format!("T{}", i)).collect();

    log::info!(
        "Generating Benchmark: {}x{} grid, {} tile types, up to {} wires per side (seed {})",
        width,
        height,
        num_tile_types,
        max_wires,
        seed
    );

    let mut grid = BufWriter::new(File::create(grid_file)?);
    writeln!(grid, "# generated benchmark, seed {}", seed)?;
    writeln!(grid, "GRID {} {}", width, height)?;
    for y in 0..height {
        for x in 0..width {
            let tile = &tile_names[rng.gen_range(0..num_tile_types)];
            writeln!(grid, "TILE {} {} {}", x, y, tile)?;
        }
    }
    grid.flush()?;

    // Only east and north are written; the index synthesizes west and south.
    let mut entries = Vec::new();
    for from in &tile_names {
        for to in &tile_names {
            for (delta, out_dir, in_dir) in [((1, 0), "E", "W"), ((0, 1), "N", "S")] {
                let num_wires = rng.gen_range(0..=max_wires);
                if num_wires == 0 {
                    continue;
                }
                let wire_pairs = (0..num_wires)
                    .map(|k| (format!("{}{}_BEG", out_dir, k), format!("{}{}_END", in_dir, k)))
                    .collect();
                entries.push(TileConnEntry {
                    tile_types: (from.clone(), to.clone()),
                    grid_deltas: delta,
                    wire_pairs,
                });
            }
        }
    }

    let writer = BufWriter::new(File::create(tileconn_file)?);
    serde_json::to_writer_pretty(writer, &entries)?;

    log::info!("Wrote {} connectivity records", entries.len());
    Ok(())
}
