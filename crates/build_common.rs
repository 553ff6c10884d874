// Shared build script helper that turns a crate README into its rustdoc front page.
// Pull it into a build.rs with: include!("../build_common.rs");
//
// The including file must import:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Copy `README.md` into `OUT_DIR/README_GENERATED.md`, rewriting links for rustdoc.
///
/// Links of the form `](src/foo.rs)` become `](foo)` so they resolve to modules,
/// and `](../../README.md` is pointed at the workspace repository URL.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let readme = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme).unwrap_or_default();

    let mut rendered = content.replace("](src/", "](").replace(".rs)", ")");
    if let Some(url) = workspace_repository(crate_dir) {
        rendered = rendered.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rendered).unwrap();
}

/// Read `repository = "..."` from the workspace manifest two levels up.
fn workspace_repository(crate_dir: &str) -> Option<String> {
    let manifest = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("repository") && line.contains('='))
        .find_map(|line| {
            let start = line.find('"')?;
            let end = line.rfind('"')?;
            (start < end).then(|| line[start + 1..end].to_string())
        })
}
