use crate::db::core::{DeviceDB, WirePair};
use crate::geom::coord::Delta;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};

/// One element of a `tileconn.json` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConnEntry {
    pub tile_types: (String, String),
    pub grid_deltas: (i32, i32),
    pub wire_pairs: Vec<(String, String)>,
}

pub fn parse(db: &mut DeviceDB, filename: &str) -> Result<()> {
    let file = File::open(filename).with_context(|| format!("cannot open '{}'", filename))?;
    parse_reader(db, BufReader::new(file))
}

pub fn parse_reader<R: Read>(db: &mut DeviceDB, reader: R) -> Result<()> {
    let entries: Vec<TileConnEntry> = serde_json::from_reader(reader)?;
    let num_entries = entries.len();
    let mut num_pairs = 0;

    for entry in entries {
        let (from, to) = entry.tile_types;
        let (dx, dy) = entry.grid_deltas;
        num_pairs += entry.wire_pairs.len();

        let wire_pairs = entry
            .wire_pairs
            .into_iter()
            .map(|(source, dest)| WirePair::new(source, dest))
            .collect();
        db.add_connection(&from, &to, Delta::new(dx, dy), wire_pairs);
    }

    log::info!(
        "Loaded {} connectivity records ({} wire pairs, {} tile types)",
        num_entries,
        num_pairs,
        db.tile_types.len()
    );
    Ok(())
}
