//! Process-wide setup: log subscriber and panic hook.

use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count. `RUST_LOG` overrides it entirely.
pub fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info,wgpu=warn,naga=warn",
        1 => "info,lbar_core=debug,lbar_bridge=debug,wgpu=warn,naga=warn",
        _ => "debug,lbar_core=trace,lbar_bridge=trace,wgpu=warn,naga=warn",
    }
}

/// Install the global subscriber. Logs go to stderr; stdout is never used.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");

        tracing::error!(%location, %payload, thread, "panic");
    }));
}
