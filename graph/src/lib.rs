pub mod allocator;
pub mod emitter;
pub mod index;
pub mod walker;

use index::ConnectivityIndex;
use tileconn_common::db::core::DeviceDB;
use tileconn_common::db::rrgraph::{EdgeKind, RrGraph};
use tileconn_common::error::BuildError;
use tileconn_common::util::config::BuildConfig;
use tileconn_common::util::profiler::StageTimer;

/// Runs index -> walk -> allocate -> emit over `db`. Either the whole graph
/// is returned or nothing is.
pub fn build(db: &DeviceDB, config: &BuildConfig) -> Result<RrGraph, BuildError> {
    if config.threads > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
        {
            Ok(pool) => return pool.install(|| build_graph(db)),
            Err(e) => log::warn!(
                "Could not create a {}-thread pool ({}); using the global pool",
                config.threads,
                e
            ),
        }
    }
    build_graph(db)
}

fn build_graph(db: &DeviceDB) -> Result<RrGraph, BuildError> {
    let timer = StageTimer::start("Connectivity index");
    let index = ConnectivityIndex::build(&db.connections, &db.tile_types)?;
    timer.finish_with(format!(
        "{} records -> {} entries",
        db.connections.len(),
        index.len()
    ));

    let timer = StageTimer::start("Grid walk");
    let plan = walker::walk(&db.grid, &index, &db.tile_types)?;
    timer.finish_with(format!(
        "{} positions, {} channel conns",
        plan.positions.len(),
        plan.num_conns()
    ));

    let timer = StageTimer::start("Channel allocation");
    let assignment = allocator::allocate(&plan)?;
    timer.finish_with(format!(
        "widths X = {}, Y = {}",
        assignment.channel_width_x, assignment.channel_width_y
    ));

    let timer = StageTimer::start("Graph emission");
    let graph = emitter::emit(&assignment, &plan)?;
    timer.finish_with(format!(
        "{} nodes, {} shorts, {} pips",
        graph.num_nodes(),
        graph.edges_of_kind(EdgeKind::Short).count(),
        graph.edges_of_kind(EdgeKind::Pip).count()
    ));

    Ok(graph)
}
