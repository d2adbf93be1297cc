use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let commit = command_output("git", &["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=BORDERO_BUILD_COMMIT={commit}");

    let built_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
    println!("cargo:rustc-env=BORDERO_BUILD_DATE={built_at}");

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BORDERO_BUILD_PROFILE={profile}");

    let rustc = command_output("rustc", &["--version"]);
    println!("cargo:rustc-env=BORDERO_BUILD_RUSTC={rustc}");
}

fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
