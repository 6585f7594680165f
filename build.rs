use std::{env, fs, path::PathBuf};

/// Bosch's BMA423 feature-engine image is not redistributed here. Point
/// `WATCHY_BMA423_CONFIG` at the raw config bytes to enable step counting;
/// without it an empty image is embedded and the firmware runs without steps.
fn main() {
    println!("cargo:rerun-if-env-changed=WATCHY_BMA423_CONFIG");

    let image = match env::var_os("WATCHY_BMA423_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            println!("cargo:rerun-if-changed={}", path.display());
            fs::read(&path)
                .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
        }
        None => Vec::new(),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_file = out_dir.join("bma423_config.bin");
    fs::write(&out_file, image)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_file.display()));
}
