use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, layer::SubscriberExt, reload, EnvFilter, Registry};

/// Plain-text copy of the log output; `None` until a log file is chosen.
type FileLayer =
    Option<fmt::Layer<Registry, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>>;

static FILE_LAYER: OnceLock<reload::Handle<FileLayer, Registry>> = OnceLock::new();

/// Install the global subscriber. `log` records are forwarded into
/// `tracing`; the level comes from `RUST_LOG` and defaults to `info`.
/// Output goes to stderr, and to the log file once `set_log_file` names one.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (file_layer, handle) = reload::Layer::new(FileLayer::None);

    // `try_init` is avoided: it would install LogTracer a second time and bail out.
    let subscriber = Registry::default()
        .with(file_layer)
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr));
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = FILE_LAYER.set(handle);
    }
}

/// Start (or stop, with `None`) copying log output into `log_file`.
pub fn set_log_file(log_file: Option<&Path>) {
    let Some(handle) = FILE_LAYER.get() else {
        return;
    };
    let layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            log::warn!("Cannot open log file {}: {}", path.to_string_lossy(), e);
            None
        }
    });
    if let Err(e) = handle.reload(layer) {
        log::warn!("Cannot switch log file: {}", e);
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
