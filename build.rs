fn main() {
    // Stamp the build so hosts can report which engine revision they embed
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=LAYERKIT_BUILD_DATE={}", build_date);
}
