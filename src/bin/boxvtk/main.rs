//! boxvtk CLI - inspect box archives and decode their snapshots.

use boxvtk::archive::strip_member_extension;
use boxvtk::core::{decompress, level_suffix, LevelSelector};
use boxvtk::prelude::*;
use boxvtk::vtk::DataArray;
use std::env;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Options shared by every command.
#[derive(Default)]
struct Options {
    level: LevelSelector,
    json: bool,
    no_mmap: bool,
    strict: bool,
}

impl Options {
    fn config(&self, path: &str) -> ReaderConfig {
        let mut config = ReaderConfig::new(path).level(self.level.clone());
        if self.no_mmap {
            config = config.use_mmap(false);
        }
        if self.strict {
            config = config.policy(ScanPolicy::Strict);
        }
        config
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut log_filter = "warn";
    let mut opts = Options::default();
    let mut positional: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => log_filter = "boxvtk=debug,warn",
            "-vv" | "--trace" => log_filter = "boxvtk=trace,debug",
            "-q" | "--quiet" => log_filter = "error",
            "-j" | "--json" => opts.json = true,
            "--no-mmap" => opts.no_mmap = true,
            "--strict" => opts.strict = true,
            "-l" | "--level" => match iter.next() {
                Some(level) => opts.level = LevelSelector::new(level.as_str()),
                None => {
                    eprintln!("Error: --level needs a value");
                    std::process::exit(1);
                }
            },
            _ => positional.push(arg.as_str()),
        }
    }

    init_logging(log_filter);

    if positional.is_empty() {
        print_help();
        return;
    }

    let result = match positional[0] {
        "info" | "i" => match positional.get(1) {
            Some(path) => cmd_info(path, &opts),
            None => usage("info <file.box>"),
        },
        "levels" | "l" => match positional.get(1) {
            Some(path) => cmd_levels(path, &opts),
            None => usage("levels <file.box>"),
        },
        "times" | "t" => match positional.get(1) {
            Some(path) => cmd_times(path, &opts),
            None => usage("times <file.box>"),
        },
        "load" => match (positional.get(1), positional.get(2)) {
            (Some(path), Some(time)) => match time.parse::<f64>() {
                Ok(time) => cmd_load(path, time, &opts),
                Err(_) => {
                    eprintln!("Error: invalid time {:?}", time);
                    std::process::exit(1);
                }
            },
            _ => usage("load <file.box> <time>"),
        },
        "extract" | "x" => match (positional.get(1), positional.get(2)) {
            (Some(path), Some(dest)) => cmd_extract(path, dest, &opts),
            _ => usage("extract <file.box> <destination_directory>"),
        },
        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other, &opts)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn usage(args: &str) -> ! {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: boxvtk {}", args);
    std::process::exit(1);
}

fn print_version() {
    println!(
        "boxvtk {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("BOXVTK_BUILD_DATE"),
        env!("BOXVTK_BUILD_TIME")
    );
}

fn print_help() {
    println!("boxvtk - box archive time-series toolkit");
    println!();
    println!("USAGE:");
    println!("    boxvtk [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>           Show archive summary for the selected level");
    println!("    l, levels  <file>           List refinement levels and member counts");
    println!("    t, times   <file>           List indexed timesteps");
    println!("    load       <file> <time>    Decode the snapshot at an exact time");
    println!("    x, extract <file> <dir>     Write every decompressed member into <dir>");
    println!("    version                     Show version and build date");
    println!("    h, help                     Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -l, --level <L>  Refinement level suffix (default: unleveled members)");
    println!("    -j, --json       Machine-readable output (info)");
    println!("    --strict         Fail on the first member that cannot be indexed");
    println!("    --no-mmap        Read through a file handle instead of mapping");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    boxvtk info run.box -l a          # Summary of level 'a'");
    println!("    boxvtk times run.box              # Unleveled timesteps");
    println!("    boxvtk load run.box 1.5 -l a      # Decode the t=1.5 snapshot");
    println!("    boxvtk extract run.box out/       # Unpack all members");
    println!();
    println!("NOTES:");
    println!("    - Passing a .box file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the verbosity flags");
}

fn cmd_info(path: &str, opts: &Options) -> Result<()> {
    info!("Opening archive: {}", path);
    let reader = open_reader(path, opts)?;
    let (Some(archive), Some(index)) = (reader.archive(), reader.index()) else {
        return Err(Error::other("archive was not indexed"));
    };
    let extent = index.extent.bounds();

    if opts.json {
        let levels: Vec<String> = archive.levels().iter().map(level_name).collect();
        let skipped: Vec<serde_json::Value> = index
            .skipped
            .iter()
            .map(|s| serde_json::json!({ "member": s.name, "reason": s.reason }))
            .collect();
        let out = serde_json::json!({
            "archive": path,
            "size": archive.size(),
            "members": archive.num_members(),
            "levels": levels,
            "level": opts.level.as_str(),
            "timesteps": index.times.times(),
            "time_range": reader.time_range().map(|(a, b)| [a, b]),
            "whole_extent": extent,
            "skipped": skipped,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(e) => return Err(Error::other(e.to_string())),
        }
        return Ok(());
    }

    println!("Archive:    {}", path);
    println!("Size:       {} bytes", archive.size());
    println!("Members:    {}", archive.num_members());
    println!("Level:      {}", opts.level);
    println!("Timesteps:  {}", index.times.len());
    match reader.time_range() {
        Some((first, last)) => println!("Time range: {} .. {}", first, last),
        None => println!("Time range: (none)"),
    }
    println!(
        "Extent:     [{}, {}, {}, {}, {}, {}]",
        extent[0], extent[1], extent[2], extent[3], extent[4], extent[5]
    );
    if !index.skipped.is_empty() {
        println!();
        println!("Skipped ({}):", index.skipped.len());
        for s in &index.skipped {
            println!("  {}: {}", s.name, s.reason);
        }
    }
    Ok(())
}

fn cmd_levels(path: &str, opts: &Options) -> Result<()> {
    let archive = BoxArchive::open_opts(path, !opts.no_mmap)?;
    let mut counts: Vec<(Option<char>, usize)> = Vec::new();
    let mut invalid = 0;
    for member in archive.members() {
        match level_suffix(&member.name) {
            Ok(level) => match counts.iter_mut().find(|(l, _)| *l == level) {
                Some((_, n)) => *n += 1,
                None => counts.push((level, 1)),
            },
            Err(_) => invalid += 1,
        }
    }

    println!("Archive: {}", path);
    for (level, n) in &counts {
        println!("  {:<12} {} members", level_name(level), n);
    }
    if invalid > 0 {
        println!("  {:<12} {} members", "(invalid)", invalid);
    }
    Ok(())
}

fn cmd_times(path: &str, opts: &Options) -> Result<()> {
    let reader = open_reader(path, opts)?;
    let Some(index) = reader.index() else {
        return Err(Error::other("archive was not indexed"));
    };

    println!("{:>16}  {:<12} {:<8} MEMBER", "TIME", "VARIABLE", "LEVEL");
    for entry in &index.times {
        println!(
            "{:>16}  {:<12} {:<8} {}",
            entry.time(),
            entry.header.variable_name,
            entry.header.level_tag,
            entry.member.name
        );
    }
    Ok(())
}

fn cmd_load(path: &str, time: f64, opts: &Options) -> Result<()> {
    let reader = open_reader(path, opts)?;
    let Some(grid) = reader.try_load_at(time)? else {
        println!("No snapshot at t = {} (available: {:?})", time, reader.available_times());
        return Ok(());
    };

    println!("Snapshot:   t = {}", time);
    println!("Title:      {}", grid.title);
    println!("Dimensions: {}", grid.dimensions);
    println!("Origin:     {:?}", grid.origin.to_array());
    println!("Spacing:    {:?}", grid.spacing.to_array());
    let b = grid.bounds();
    println!("Bounds:     [{}, {}] x [{}, {}] x [{}, {}]", b[0], b[1], b[2], b[3], b[4], b[5]);

    if !grid.field_data.is_empty() {
        println!("Field data:");
        for array in &grid.field_data {
            print_array(array);
        }
    }
    if !grid.point_data.is_empty() {
        println!("Point data ({} tuples):", grid.point_data.num_tuples);
        for array in grid.point_data.iter() {
            print_array(array);
        }
    }
    if !grid.cell_data.is_empty() {
        println!("Cell data ({} tuples):", grid.cell_data.num_tuples);
        for array in grid.cell_data.iter() {
            print_array(array);
        }
    }
    Ok(())
}

fn cmd_extract(path: &str, dest: &str, opts: &Options) -> Result<()> {
    let archive = BoxArchive::open_opts(path, !opts.no_mmap)?;
    let dest = Path::new(dest);
    std::fs::create_dir_all(dest)?;

    let mut written = 0;
    for member in archive.members() {
        let Some(relative) = safe_relative_path(strip_member_extension(&member.name)) else {
            warn!(member = %member.name, "refusing to extract outside the destination");
            continue;
        };
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = archive.member_bytes(member)?;
        let payload = decompress(&bytes)?;
        std::fs::write(&target, &*payload)?;
        debug!(member = %member.name, target = %target.display(), bytes = payload.len(), "extracted");
        written += 1;
    }

    println!("Extracted {} of {} members into {}", written, archive.num_members(), dest.display());
    Ok(())
}

fn open_reader(path: &str, opts: &Options) -> Result<BoxReader> {
    let mut reader = BoxReader::new(opts.config(path));
    reader.update_information()?;
    Ok(reader)
}

/// Member path with only normal components, so it stays under the destination.
fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}

fn level_name(level: &Option<char>) -> String {
    match level {
        Some(c) => c.to_string(),
        None => "(unleveled)".to_string(),
    }
}

fn print_array(array: &DataArray) {
    let range = match array.range() {
        Some((lo, hi)) => format!("[{}, {}]", lo, hi),
        None => "[]".to_string(),
    };
    println!(
        "  {:<20} {:<20} {} x {} {} {}",
        array.name,
        array.kind,
        array.num_tuples(),
        array.num_components,
        array.values.type_name(),
        range
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(safe_relative_path("run/ham_0000_a"), Some(PathBuf::from("run/ham_0000_a")));
        assert_eq!(safe_relative_path("./ham"), Some(PathBuf::from("ham")));
        assert_eq!(safe_relative_path("../ham"), None);
        assert_eq!(safe_relative_path("/etc/ham"), None);
        assert_eq!(safe_relative_path("."), None);
    }
}
