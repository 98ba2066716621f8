use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target == name` or `target` starts with `name::`.
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target
        .strip_prefix(crate_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Accepts records at or below `max_level` whose target no explicit
/// subsystem section claims.
fn unclaimed_targets_filter(
    claimed: &[String],
    max_level: Level,
) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static> {
    let claimed = claimed.to_vec();
    FilterFn::new(move |meta: &tracing::Metadata<'_>| {
        let target = meta.target();
        !claimed.iter().any(|c| matches_crate_prefix(target, c)) && meta.level() <= &max_level
    })
}

// -------- rotating file writers --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer for one record; `None` swallows the bytes.
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Picks a log file by target prefix, falling back to the default file.
#[derive(Clone, Default)]
struct MultiFileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl MultiFileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_crate_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for MultiFileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

struct ConfigData<'a> {
    default_section: Option<&'a Section>,
    crate_sections: Vec<(String, &'a Section)>,
    crate_names: Vec<String>,
}

fn extract_config_data(cfg: &LoggingConfig) -> ConfigData<'_> {
    let crate_sections: Vec<_> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect();
    let crate_names = crate_sections.iter().map(|(n, _)| n.clone()).collect();

    ConfigData {
        default_section: cfg.get("default"),
        crate_sections,
        crate_names,
    }
}

/// Relative log paths are anchored at `base_dir` (the server home dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer_at_path(
    log_path: &Path,
    section: &Section,
) -> Result<RotWriter, std::io::Error> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let limit = match (section.max_backups, section.max_age_days) {
        (Some(files), _) => FileLimit::MaxFiles(files),
        (None, Some(days)) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        (None, None) => FileLimit::Age(chrono::Duration::days(1)),
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&section.file, base_dir);
    match create_rotating_writer_at_path(&log_path, section) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

fn build_file_router(config: &ConfigData, base_dir: &Path) -> MultiFileRouter {
    MultiFileRouter {
        default: config
            .default_section
            .and_then(|s| open_section_file("default", s, base_dir)),
        by_prefix: config
            .crate_sections
            .iter()
            .filter_map(|(name, s)| {
                open_section_file(name, s, base_dir).map(|w| (name.clone(), w))
            })
            .collect(),
    }
}

fn build_console_targets(config: &ConfigData) -> Targets {
    config
        .crate_sections
        .iter()
        .filter_map(|(name, s)| {
            parse_tracing_level(&s.console_level).map(|l| (name.clone(), LevelFilter::from_level(l)))
        })
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
            t.with_target(name, level)
        })
}

fn build_file_targets(config: &ConfigData) -> Targets {
    config
        .crate_sections
        .iter()
        .filter(|(_, s)| !s.file.trim().is_empty())
        .filter_map(|(name, s)| {
            parse_tracing_level(&s.file_level).map(|l| (name.clone(), LevelFilter::from_level(l)))
        })
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
            t.with_target(name, level)
        })
}

fn console_layer() -> fmt::Layer<Registry> {
    fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
}

fn build_layers(config: &ConfigData, router: MultiFileRouter) -> Vec<BoxedLayer> {
    let timer = || fmt::time::UtcTime::rfc_3339();
    let mut layers: Vec<BoxedLayer> = vec![console_layer()
        .with_timer(timer())
        .with_filter(build_console_targets(config))
        .boxed()];

    if !router.is_empty() {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(timer())
                .with_writer(router.clone())
                .with_filter(build_file_targets(config))
                .boxed(),
        );
    }

    let Some(default_section) = config.default_section else {
        return layers;
    };

    if let Some(level) = parse_tracing_level(&default_section.console_level) {
        layers.push(
            console_layer()
                .with_timer(timer())
                .with_filter(unclaimed_targets_filter(&config.crate_names, level))
                .boxed(),
        );
    }

    if router.default.is_some() {
        if let Some(level) = parse_tracing_level(&default_section.file_level) {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(timer())
                    .with_writer(router)
                    .with_filter(unclaimed_targets_filter(&config.crate_names, level))
                    .boxed(),
            );
        }
    }

    layers
}

/// Install the global subscriber.
///
/// Every non-`default` key of `cfg` is a target prefix with its own console
/// level and optional JSON log file; `default` covers the remaining targets.
/// Relative file paths resolve against `base_dir`. Calling this twice is a
/// no-op for the second call.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let config = extract_config_data(cfg);
    let router = build_file_router(&config, base_dir);
    let layers = build_layers(&config, router);
    let _ = Registry::default().with(layers).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(file: &str) -> Section {
        Section {
            console_level: "info".into(),
            file: file.into(),
            file_level: "debug".into(),
            max_age_days: Some(7),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("bogus"), Some(Level::INFO));
    }

    #[test]
    fn test_crate_prefix_matching() {
        assert!(matches_crate_prefix("ghc_api", "ghc_api"));
        assert!(matches_crate_prefix("ghc_api::api::rest", "ghc_api"));
        assert!(!matches_crate_prefix("ghc_api_extra", "ghc_api"));
        assert!(!matches_crate_prefix("audit", "ghc_api"));
    }

    #[test]
    fn test_extract_config_data_splits_default() {
        let mut cfg = default_logging_config();
        cfg.insert("audit".into(), section("logs/audit.log"));

        let data = extract_config_data(&cfg);
        assert!(data.default_section.is_some());
        assert_eq!(data.crate_names, vec!["audit".to_string()]);
    }

    #[test]
    fn test_relative_paths_anchor_at_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/elsewhere")), abs);
    }

    #[test]
    fn test_router_routes_by_prefix_and_falls_back() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("audit".into(), section("logs/audit.log"));
        cfg.insert("quiet".into(), section(""));

        let data = extract_config_data(&cfg);
        let router = build_file_router(&data, tmp.path());

        assert!(router.default.is_some());
        assert!(router.by_prefix.contains_key("audit"));
        assert!(!router.by_prefix.contains_key("quiet"));
        assert!(router.resolve_for("audit").is_some());
        assert!(router.resolve_for("ghc_api::infra").is_some());
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn test_router_without_files_drops_records() {
        let router = MultiFileRouter::default();
        assert!(router.is_empty());
        let mut w = RoutedWriter(router.resolve_for("anything"));
        assert_eq!(w.write(b"dropped").unwrap(), 7);
    }
}
