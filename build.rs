use time::format_description;

/// Export `name` to the crate, preferring a value already set in the environment.
fn stamp(name: &str, now: time::OffsetDateTime, pattern: &str) {
    let value = std::env::var(name).unwrap_or_else(|_| {
        format_description::parse(pattern)
            .ok()
            .and_then(|fmt| now.format(&fmt).ok())
            .unwrap_or_else(|| "unknown".to_string())
    });
    println!("cargo:rustc-env={name}={value}");
    println!("cargo:rerun-if-env-changed={name}");
}

fn main() {
    let now = time::OffsetDateTime::now_utc();
    stamp("BOXY_BUILD_DATE", now, "[year]-[month]-[day]");
    stamp("BOXY_BUILD_TIME", now, "[hour]:[minute]:[second]");
}
