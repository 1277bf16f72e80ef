use std::process::Command;

/// `git rev-parse` with the given args, or "unknown" when git is absent
/// (e.g. building from a source tarball).
fn git_hash(args: &[&str]) -> String {
    Command::new("git")
        .arg("rev-parse")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_owned())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_hash(&["--short", "HEAD"]));
    println!("cargo:rustc-env=GIT_HASH_FULL={}", git_hash(&["HEAD"]));

    // Build timestamp in ISO 8601 (UTC)
    let build_timestamp = {
        use time::format_description::well_known::Rfc3339;
        use time::OffsetDateTime;

        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_owned())
    };
    println!("cargo:rustc-env=BUILD_TIMESTAMP={build_timestamp}");

    println!("cargo:rerun-if-changed=.git/HEAD");
}
