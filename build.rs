//! Build script for liftlog
//!
//! Stamps the build date into the binary. `SOURCE_DATE_EPOCH` pins it for
//! reproducible builds.

use chrono::{DateTime, Utc};

fn build_date() -> String {
    let pinned = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    pinned
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d")
        .to_string()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rustc-env=LIFTLOG_BUILD_DATE={}", build_date());
}
