use time::format_description;
use time::formatting::Formattable;
use time::OffsetDateTime;

/// Emit `var` for the crate: taken from the environment when set (for
/// reproducible builds), otherwise `now` in `format`.
fn stamp<F: Formattable + ?Sized>(var: &str, format: &F, now: OffsetDateTime) {
    println!("cargo:rerun-if-env-changed={}", var);
    let value = std::env::var(var)
        .ok()
        .or_else(|| now.format(format).ok())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={}={}", var, value);
}

fn main() {
    let now = OffsetDateTime::now_utc();
    let stamps = [
        ("UNITCAPTURE_BUILD_DATE", "[year]-[month]-[day]"),
        ("UNITCAPTURE_BUILD_TIME", "[hour]:[minute]:[second] UTC"),
    ];

    for (var, pattern) in stamps {
        match format_description::parse(pattern) {
            Ok(format) => stamp(var, format.as_slice(), now),
            Err(e) => {
                println!("cargo:warning=bad {} format: {}", var, e);
                println!("cargo:rustc-env={}=unknown", var);
            }
        }
    }
}
