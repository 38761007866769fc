use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    // OUT_DIR is typically: target/debug/build/backend-xxx/out
    // The binary lands in target/debug or target/release
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let out_path = Path::new(&out_dir);
    let target_dir = match out_path.ancestors().find(|p| p.ends_with(&profile)) {
        Some(dir) => dir.to_path_buf(),
        None => return,
    };

    // Кладем config.toml рядом с бинарником (оттуда его читает load_config)
    let source = Path::new("../../config.toml");
    if source.exists() {
        let dest = target_dir.join("config.toml");
        if let Err(e) = fs::copy(source, &dest) {
            println!("cargo:warning=Failed to copy config.toml: {}", e);
        }
    }
}
