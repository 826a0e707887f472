use crate::db::core::{DeviceDB, Grid};
use crate::geom::coord::GridPosition;
use anyhow::{Context, Result, anyhow, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Reads a grid description:
///
/// ```text
/// # comment
/// GRID <width> <height>
/// TILE <x> <y> <tile_type>
/// ```
pub fn parse(db: &mut DeviceDB, filename: &str) -> Result<()> {
    let file = File::open(filename).with_context(|| format!("cannot open '{}'", filename))?;
    parse_reader(db, BufReader::new(file))
}

pub fn parse_reader<R: BufRead>(db: &mut DeviceDB, reader: R) -> Result<()> {
    let mut declared = false;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let content = line.split('#').next().unwrap_or("");
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "GRID" => {
                if declared {
                    bail!("line {}: GRID declared twice", line_no);
                }
                if parts.len() != 3 {
                    bail!("line {}: expected 'GRID <width> <height>'", line_no);
                }
                let width: u32 = parse_field(parts[1], "width", line_no)?;
                let height: u32 = parse_field(parts[2], "height", line_no)?;
                db.grid = Grid::new(width, height);
                declared = true;
            }
            "TILE" => {
                if !declared {
                    bail!("line {}: TILE before GRID", line_no);
                }
                if parts.len() != 4 {
                    bail!("line {}: expected 'TILE <x> <y> <tile_type>'", line_no);
                }
                let x: u32 = parse_field(parts[1], "x", line_no)?;
                let y: u32 = parse_field(parts[2], "y", line_no)?;
                let pos = GridPosition::new(x, y);
                if !db.grid.contains(pos) {
                    bail!(
                        "line {}: tile at {} outside {}x{} grid",
                        line_no,
                        pos,
                        db.grid.width(),
                        db.grid.height()
                    );
                }
                if let Some(prev) = db.place_tile(pos, parts[3]) {
                    log::warn!(
                        "line {}: tile {} at {} replaced by {}",
                        line_no,
                        db.tile_types.display_name(prev),
                        pos,
                        parts[3]
                    );
                }
            }
            other => bail!("line {}: unknown keyword '{}'", line_no, other),
        }
    }

    if !declared {
        bail!("missing GRID declaration");
    }

    let placed = db.grid.num_placed();
    if placed < db.grid.num_positions() {
        log::warn!(
            "{} of {} grid positions have no tile",
            db.grid.num_positions() - placed,
            db.grid.num_positions()
        );
    }
    log::info!(
        "Loaded {}x{} grid ({} tiles)",
        db.grid.width(),
        db.grid.height(),
        placed
    );
    Ok(())
}

fn parse_field(token: &str, what: &str, line_no: usize) -> Result<u32> {
    token
        .parse()
        .map_err(|e| anyhow!("line {}: invalid {} '{}': {}", line_no, what, token, e))
}
