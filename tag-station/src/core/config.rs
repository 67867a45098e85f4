use std::path::PathBuf;
use std::time::Duration;

use crate::printing::DispatchOptions;

/// Station configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./work_dir | working directory |
/// | QUEUE_DB | $WORK_DIR/label_queue.redb | pending queue database |
/// | PRINTER_ADDR | - | default printer `host:port` |
/// | PRINTER_NAME | Zebra ZPL Printer | display name |
/// | PRINTER_PROBE_TIMEOUT_MS | 500 | reachability probe |
/// | PRINTER_CONNECT_TIMEOUT_MS | 5000 | per-send connect timeout |
/// | PRINT_PACING_MS | 100 | delay between labels |
/// | PRINT_SEND_TIMEOUT_MS | - | optional upper bound per send |
/// | LOGO_PATH | - | logo image for the logo slot |
/// | LOG_LEVEL | info | log filter when RUST_LOG is unset |
/// | LOG_DIR | - | daily rolling log files |
/// | LOG_JSON | false | JSON console logs |
///
/// # Example
///
/// ```ignore
/// PRINTER_ADDR=192.168.1.50:9100 PRINT_PACING_MS=250 tag-station print
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub queue_db: Option<String>,
    pub printer_addr: Option<String>,
    pub printer_name: String,
    pub printer_probe_timeout_ms: u64,
    pub printer_connect_timeout_ms: u64,
    pub print_pacing_ms: u64,
    pub print_send_timeout_ms: Option<u64>,
    pub logo_path: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            queue_db: non_empty_var("QUEUE_DB"),
            printer_addr: non_empty_var("PRINTER_ADDR"),
            printer_name: std::env::var("PRINTER_NAME")
                .unwrap_or_else(|_| "Zebra ZPL Printer".into()),
            printer_probe_timeout_ms: parsed_var("PRINTER_PROBE_TIMEOUT_MS").unwrap_or(500),
            printer_connect_timeout_ms: parsed_var("PRINTER_CONNECT_TIMEOUT_MS").unwrap_or(5000),
            print_pacing_ms: parsed_var("PRINT_PACING_MS").unwrap_or(100),
            print_send_timeout_ms: parsed_var("PRINT_SEND_TIMEOUT_MS"),
            logo_path: non_empty_var("LOGO_PATH"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_var("LOG_DIR"),
            log_json: parsed_var("LOG_JSON").unwrap_or(false),
        }
    }

    /// Queue database location
    pub fn queue_db_path(&self) -> PathBuf {
        match &self.queue_db {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("label_queue.redb"),
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            pacing: Duration::from_millis(self.print_pacing_ms),
            send_timeout: self.print_send_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_connect_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_probe_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
