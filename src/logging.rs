use cfg_if::cfg_if;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset. Per-frame traces stay off.
pub const DEFAULT_FILTER: &str = "info,skyrunner=debug";

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Log to the browser console. Safe to call more than once.
        pub fn init() {
            let filter = EnvFilter::new(DEFAULT_FILTER);
            let wasm_layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default());

            if tracing_subscriber::registry().with(filter).with(wasm_layer).try_init().is_err() {
                return;
            }

            #[cfg(feature = "console_error_panic_hook")]
            console_error_panic_hook::set_once();
        }
    } else {
        use once_cell::sync::OnceCell;
        use std::env;
        use std::ffi::OsStr;
        use std::io;
        use std::path::Path;
        use tracing_appender::non_blocking::WorkerGuard;
        use tracing_subscriber::fmt;

        static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

        /// Log to stderr and to a daily-rolling file (`RUST_LOG_FILE`,
        /// default `logs/skyrunner.log`). Safe to call more than once.
        pub fn init() {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

            let console_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            let log_path = env::var("RUST_LOG_FILE").unwrap_or_else(|_| "logs/skyrunner.log".to_string());
            let log_path = Path::new(&log_path);
            let (nb_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
                log_path.parent().unwrap_or(Path::new(".")),
                log_path.file_name().unwrap_or(OsStr::new("skyrunner.log")),
            ));

            let file_layer = fmt::layer()
                .with_writer(nb_writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_level(true)
                .compact();

            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init();
            if installed.is_err() {
                return;
            }
            let _ = FILE_GUARD.set(guard);

            std::panic::set_hook(Box::new(|info| {
                let mut msg = String::new();
                if let Some(loc) = info.location() {
                    msg.push_str(&format!("panic at {}:{}:{} ", loc.file(), loc.line(), loc.column()));
                }
                if let Some(s) = info.payload().downcast_ref::<&str>() { msg.push_str(s); }
                else if let Some(s) = info.payload().downcast_ref::<String>() { msg.push_str(s); }
                else { msg.push_str("<non-string panic>"); }
                let bt = std::backtrace::Backtrace::force_capture();
                tracing::error!("{}\nBacktrace:\n{:?}", msg, bt);
            }));
        }
    }
}
