//! Engine and buffer fixtures

use imprint_vim::{parse_keys, MemoryHost, Position, TextHost, VimEngine};

/// Route engine logs to the test writer. Set `RUST_LOG=imprint_vim=trace` to see them.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh engine and a host holding `text`.
pub fn setup(text: &str) -> (VimEngine, MemoryHost) {
    init_tracing();
    (VimEngine::default(), MemoryHost::new(text))
}

/// Type `keys` (in key notation) as a user would.
pub fn feed(engine: &mut VimEngine, host: &mut MemoryHost, keys: &str) {
    engine.feed_keys(&parse_keys(keys), host);
}

/// Type `keys` into a fresh engine over `text`.
#[allow(dead_code)]
pub fn run(text: &str, keys: &str) -> (VimEngine, MemoryHost) {
    let (mut engine, mut host) = setup(text);
    feed(&mut engine, &mut host, keys);
    (engine, host)
}

/// The host cursor as `(line, column)`.
#[allow(dead_code)]
pub fn cursor(host: &MemoryHost) -> (usize, usize) {
    let Position { line, column } = host.cursor();
    (line, column)
}
