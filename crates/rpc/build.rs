use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    if env::var_os("PROTOC").is_none() {
        env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("shoal_descriptor.bin"))
        .compile_protos(
            &["proto/tracker.proto", "proto/peer.proto"],
            &["proto"],
        )?;

    Ok(())
}
