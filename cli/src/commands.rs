//! Subcommand implementations. Every command reports failures as a message
//! for the user; nothing here panics on bad input.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use netlog_core::registry::{self, DefinitionFile, LineRegistry};
use netlog_core::{
    CollectingNotifier, LogFile, SplitError, Splitter, SplitterConfig, ZoneIndex,
};
use netlog_types::SplitSettings;
use netlog_types::formatting::{format_duration, format_thousands};
use rayon::prelude::*;

use crate::summary::SplitSummary;

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Builtin definitions, then the settings' custom directory, then `extra`
/// (a single TOML file or a directory of them).
pub fn load_registry(settings: &SplitSettings, extra: Option<&Path>) -> Result<LineRegistry, String> {
    let custom_dir = settings
        .custom_definitions_dir
        .clone()
        .or_else(registry::config::default_custom_dir);

    let mut registry =
        registry::load_definitions(custom_dir.as_deref()).map_err(|e| e.to_string())?;

    if let Some(extra) = extra {
        if extra.is_dir() {
            let layered = registry::load_definitions(Some(extra)).map_err(|e| e.to_string())?;
            for schema in layered.iter() {
                registry.insert(schema.clone());
            }
        } else {
            let file = registry::load_file(extra).map_err(|e| e.to_string())?;
            let replaced = registry.add_definitions(file);
            if !replaced.is_empty() {
                tracing::info!(tags = ?replaced, path = %extra.display(), "Overrode line definitions");
            }
        }
    }

    Ok(registry)
}

/// Write the active definitions as TOML, as a starting point for custom files
pub fn dump_definitions(registry: &LineRegistry, output: &Path) -> Result<(), String> {
    let file = DefinitionFile {
        lines: registry.sorted().into_iter().cloned().collect(),
    };
    registry::save_file(output, &file).map_err(|e| e.to_string())?;
    println!(
        "Wrote {} line definitions to {}",
        file.lines.len(),
        output.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Zones
// ─────────────────────────────────────────────────────────────────────────────

pub fn list_zones(path: &Path, registry: &LineRegistry, json: bool) -> Result<(), String> {
    let log = LogFile::open(path).map_err(|e| e.to_string())?;
    let index = ZoneIndex::scan(registry, log.lines());

    if json {
        let text = serde_json::to_string_pretty(&index).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    if index.is_empty() {
        println!("No zone changes in {}", path.display());
        return Ok(());
    }

    println!(
        "{} zone change(s) in {} ({} lines)",
        index.len(),
        path.display(),
        format_thousands(index.total_lines as u64)
    );
    for zone in index.iter() {
        let duration = zone
            .duration_secs()
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<40} lines {:>9}-{:<9} {:>8}",
            zone.ordinal,
            zone.display_name(),
            zone.first_line,
            zone.last_line,
            duration
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Split
// ─────────────────────────────────────────────────────────────────────────────

/// Which part of the log a split extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRange {
    /// One zone, by ordinal from `netlog zones`
    Zone(usize),
    /// 1-based line numbers, both inclusive
    Lines { start: usize, stop: usize },
    Whole,
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub range: SplitRange,
    pub analysis: bool,
    pub include_globals: bool,
}

impl SplitOptions {
    /// Fill unset flags from persisted settings
    pub fn from_settings(range: SplitRange, settings: &SplitSettings, analysis: bool, no_globals: bool) -> Self {
        Self {
            range,
            analysis: analysis || settings.mode.is_analysis(),
            include_globals: settings.include_globals && !no_globals,
        }
    }
}

/// Resolve a range to engine boundaries over the given lines.
///
/// Returns the config and, for zone splits, the zone's display name.
pub fn resolve_range(
    range: SplitRange,
    registry: &LineRegistry,
    lines: &[&str],
) -> Result<(SplitterConfig, Option<String>), SplitError> {
    match range {
        SplitRange::Zone(ordinal) => {
            let index = ZoneIndex::scan(registry, lines.iter().copied());
            let zone = index.get(ordinal).ok_or(SplitError::ZoneNotFound {
                ordinal,
                available: index.len(),
            })?;
            Ok((zone.splitter_config(), Some(zone.display_name())))
        }
        SplitRange::Lines { start, stop } => {
            let total = lines.len();
            let line_at = |line: usize| {
                line.checked_sub(1)
                    .and_then(|i| lines.get(i))
                    .copied()
                    .ok_or(SplitError::LineOutOfRange { line, total })
            };
            let (start_text, stop_text) = (line_at(start)?, line_at(stop)?);
            if stop < start {
                return Err(SplitError::LineOutOfRange { line: stop, total });
            }
            Ok((SplitterConfig::new(start_text, stop_text), None))
        }
        SplitRange::Whole => Ok((SplitterConfig::process_all(), None)),
    }
}

/// Split one file into `output`.
pub fn split_file(
    input: &Path,
    output: &Path,
    options: &SplitOptions,
    registry: Arc<LineRegistry>,
) -> Result<SplitSummary, String> {
    let log = LogFile::open(input).map_err(|e| e.to_string())?;
    let lines: Vec<&str> = log.lines().collect();

    let (config, zone) =
        resolve_range(options.range, &registry, &lines).map_err(|e| e.to_string())?;
    let config = config
        .with_globals(options.include_globals)
        .with_analysis_filter(options.analysis);

    let mut splitter = Splitter::with_notifier(config, registry, CollectingNotifier::new())
        .map_err(|e| e.to_string())?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    let file = File::create(output).map_err(|e| format!("Failed to create {}: {e}", output.display()))?;
    let mut writer = BufWriter::new(file);

    splitter
        .run(lines.iter().copied(), |line| writeln!(writer, "{line}"))
        .and_then(|()| writer.flush())
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;

    if !splitter.was_started() {
        tracing::warn!(path = %input.display(), "Start line never seen, excerpt is empty");
    }
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        emitted = splitter.stats().lines_emitted,
        "Split complete"
    );

    Ok(SplitSummary::from_splitter(
        input.to_path_buf(),
        output.to_path_buf(),
        zone,
        lines.len(),
        &splitter,
    ))
}

pub fn split(
    input: &Path,
    output: &Path,
    options: &SplitOptions,
    registry: Arc<LineRegistry>,
    json: bool,
) -> Result<(), String> {
    let summary = split_file(input, output, options, registry)?;
    print_summaries(&[summary], json)
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Run the analysis filter over whole files in parallel. Each output keeps the
/// input's file name.
pub fn filter_files(
    inputs: &[PathBuf],
    out_dir: &Path,
    registry: Arc<LineRegistry>,
    json: bool,
) -> Result<(), String> {
    fs::create_dir_all(out_dir).map_err(|e| format!("Failed to create {}: {e}", out_dir.display()))?;

    let options = SplitOptions {
        range: SplitRange::Whole,
        analysis: true,
        include_globals: true,
    };

    let results: Vec<Result<SplitSummary, String>> = inputs
        .par_iter()
        .map(|input| {
            let name = input
                .file_name()
                .ok_or_else(|| format!("Not a file: {}", input.display()))?;
            let output = out_dir.join(name);
            split_file(input, &output, &options, Arc::clone(&registry))
                .map_err(|e| format!("{}: {e}", input.display()))
        })
        .collect();

    let mut summaries = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                tracing::error!(error = %e, "Filter failed");
                failures.push(e);
            }
        }
    }

    print_summaries(&summaries, json)?;

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} file(s) failed:\n{}",
            failures.len(),
            inputs.len(),
            failures.join("\n")
        ))
    }
}

fn print_summaries(summaries: &[SplitSummary], json: bool) -> Result<(), String> {
    if json {
        let text = if let [single] = summaries {
            single.to_json()?
        } else {
            serde_json::to_string_pretty(summaries).map_err(|e| e.to_string())?
        };
        println!("{text}");
    } else {
        for summary in summaries {
            print!("{}", summary.render());
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_settings(settings: &SplitSettings) -> Result<(), String> {
    let path = crate::settings_path()?;
    println!("Settings file: {}", path.display());
    println!("  mode:              {:?}", settings.mode);
    println!("  include_globals:   {}", settings.include_globals);
    let dir = |d: &Option<PathBuf>| {
        d.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };
    println!("  definitions dir:   {}", dir(&settings.custom_definitions_dir));
    println!("  output dir:        {}", dir(&settings.output_dir));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
253|2024-03-01T20:00:00.0000000+01:00|FFXIV_ACT_Plugin Version: 2.7|h
01|2024-03-01T20:00:05.0000000+01:00|3E8|Limsa Lominsa|h
21|2024-03-01T20:00:06.0000000+01:00|10FF0001|Tank|1D6B|Holy Spirit|4000A1B2|Dummy|h
01|2024-03-01T20:01:00.0000000+01:00|44A|The Arena|h
03|2024-03-01T20:01:01.0000000+01:00|4000A1B2|Boss|00|64|0000|h
21|2024-03-01T20:02:00.0000000+01:00|4000A1B2|Boss|9A3F|Megaflare|10FF0001|Tank|h
39|2024-03-01T20:02:01.0000000+01:00|4000A1B2|Boss|100|100|h
21|2024-03-01T20:02:02.0000000+01:00|10FF0001|Tank|1D6B|Holy Spirit|4000A1B2|Boss|h
";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("netlog-cli-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn registry() -> Arc<LineRegistry> {
        Arc::new(LineRegistry::builtin())
    }

    fn options(range: SplitRange, analysis: bool) -> SplitOptions {
        SplitOptions {
            range,
            analysis,
            include_globals: true,
        }
    }

    #[test]
    fn test_split_by_zone_writes_excerpt() {
        let dir = temp_dir("zone");
        let input = dir.join("network.log");
        fs::write(&input, LOG).unwrap();
        let output = dir.join("out").join("arena.log");

        let summary = split_file(&input, &output, &options(SplitRange::Zone(2), false), registry()).unwrap();
        assert!(summary.started);
        assert!(summary.done);
        assert_eq!(summary.zone.as_deref(), Some("The Arena (44A)"));

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        // version and previous zone line flushed ahead of the zone change, then the whole zone
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("253|"));
        assert!(lines[1].contains("Limsa Lominsa"));
        assert!(lines[2].starts_with("01|") && lines[2].contains("The Arena"));
        assert!(lines[3].starts_with("03|"));
        assert!(lines[6].contains("Holy Spirit"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_split_by_line_range_in_analysis_mode() {
        let dir = temp_dir("range");
        let input = dir.join("network.log");
        fs::write(&input, LOG).unwrap();
        let output = dir.join("range.log");

        let summary = split_file(
            &input,
            &output,
            &options(SplitRange::Lines { start: 4, stop: 8 }, true),
            registry(),
        )
        .unwrap();
        assert_eq!(summary.stats.dropped_by_filter, 2);

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("The Arena"));
        assert!(lines[1].starts_with("03|"));
        assert!(lines[2].contains("Megaflare"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_range_errors() {
        let lines: Vec<&str> = LOG.lines().collect();
        let registry = LineRegistry::builtin();
        assert!(matches!(
            resolve_range(SplitRange::Zone(9), &registry, &lines),
            Err(SplitError::ZoneNotFound { ordinal: 9, available: 2 })
        ));
        assert!(matches!(
            resolve_range(SplitRange::Lines { start: 0, stop: 2 }, &registry, &lines),
            Err(SplitError::LineOutOfRange { line: 0, .. })
        ));
        assert!(matches!(
            resolve_range(SplitRange::Lines { start: 5, stop: 2 }, &registry, &lines),
            Err(SplitError::LineOutOfRange { line: 2, .. })
        ));
        let (config, zone) = resolve_range(SplitRange::Whole, &registry, &lines).unwrap();
        assert_eq!(config, SplitterConfig::process_all());
        assert!(zone.is_none());
    }

    #[test]
    fn test_filter_files_keeps_names() {
        let dir = temp_dir("filter");
        let a = dir.join("a.log");
        let b = dir.join("b.log");
        fs::write(&a, LOG).unwrap();
        fs::write(&b, LOG).unwrap();
        let out_dir = dir.join("filtered");

        filter_files(&[a, b], &out_dir, registry(), true).unwrap();
        for name in ["a.log", "b.log"] {
            let written = fs::read_to_string(out_dir.join(name)).unwrap();
            assert!(written.contains("Megaflare"));
            assert!(!written.contains("Holy Spirit"));
            assert!(!written.starts_with("39|"));
            assert!(!written.contains("Plugin Version"));
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_filter_reports_missing_files() {
        let dir = temp_dir("missing");
        let err = filter_files(&[dir.join("nope.log")], &dir, registry(), false).unwrap_err();
        assert!(err.contains("1 of 1"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_registry_layers_extra_file() {
        let dir = temp_dir("registry");
        let defs = dir.join("custom.toml");
        fs::write(
            &defs,
            r#"
[[line]]
tag = "39"
name = "UpdateHp"
analysis = "all"
"#,
        )
        .unwrap();

        let settings = SplitSettings {
            custom_definitions_dir: Some(dir.join("does-not-exist")),
            ..SplitSettings::default()
        };
        let registry = load_registry(&settings, Some(&defs)).unwrap();
        assert_eq!(
            registry.get("39").unwrap().analysis,
            netlog_core::registry::AnalysisInclusion::All
        );
        assert!(registry.contains("21"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dump_definitions_round_trips() {
        let dir = temp_dir("dump");
        let path = dir.join("defs.toml");
        let registry = LineRegistry::builtin();
        dump_definitions(&registry, &path).unwrap();
        let loaded = registry::load_file(&path).unwrap();
        assert_eq!(loaded.lines.len(), registry.len());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_options_from_settings() {
        let settings = SplitSettings {
            mode: netlog_types::SplitMode::Analysis,
            ..SplitSettings::default()
        };
        let opts = SplitOptions::from_settings(SplitRange::Whole, &settings, false, true);
        assert!(opts.analysis);
        assert!(!opts.include_globals);
    }
}
