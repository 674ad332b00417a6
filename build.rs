use time::{format_description, OffsetDateTime};

/// Build instant: `SOURCE_DATE_EPOCH` for reproducible builds, otherwise now.
fn build_instant() -> OffsetDateTime {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

/// Export `var` to the crate, preferring an explicit value from the environment.
fn stamp(var: &str, instant: OffsetDateTime, pattern: &str) {
    println!("cargo:rerun-if-env-changed={}", var);
    let value = std::env::var(var)
        .ok()
        .or_else(|| {
            let format = format_description::parse(pattern).ok()?;
            instant.format(&format).ok()
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={}={}", var, value);
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let instant = build_instant();
    stamp("BOXVTK_BUILD_DATE", instant, "[year]-[month]-[day]");
    stamp("BOXVTK_BUILD_TIME", instant, "[hour]:[minute]:[second] UTC");
}
