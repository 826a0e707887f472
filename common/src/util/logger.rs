use std::io::Write;

/// Installs the global logger. Defaults to `info`; `RUST_LOG` overrides.
/// Safe to call more than once.
pub fn init() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()));
    let _ = builder.try_init();
}
