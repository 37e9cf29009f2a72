fn main() {
    // GOOGLE_API_KEY is read at runtime, never baked into the binary.
    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=ui");

    tauri_build::build()
}
