//! Embeds `overlays/<package>/overlays.json` files into the library.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const OVERLAY_FILE_NAME: &str = "overlays.json";

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let overlays_dir = Path::new(&manifest_dir).join("overlays");
    println!("cargo:rerun-if-changed={}", overlays_dir.display());

    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    if let Ok(read_dir) = fs::read_dir(&overlays_dir) {
        for entry in read_dir.flatten() {
            let file = entry.path().join(OVERLAY_FILE_NAME);
            if file.is_file() {
                println!("cargo:rerun-if-changed={}", file.display());
                entries.push((entry.file_name().to_string_lossy().into_owned(), file));
            }
        }
    }
    entries.sort();

    let mut generated = String::from(
        "/// Overlay documents embedded at build time, keyed by package name.\n\
         pub static BUNDLED_OVERLAYS: &[(&str, &[u8])] = &[\n",
    );
    for (package, file) in &entries {
        let file = file.display().to_string();
        writeln!(generated, "    ({package:?}, include_bytes!({file:?})),")
            .expect("writing to a String cannot fail");
    }
    generated.push_str("];\n");

    fs::write(Path::new(&out_dir).join("bundled_overlays.rs"), generated)
        .expect("failed to write bundled_overlays.rs");
}
