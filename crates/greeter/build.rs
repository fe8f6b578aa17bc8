// crates/greeter/build.rs

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = "proto";

    tonic_prost_build::configure().compile_protos(
        &[
            format!("{}/greeter/v1/greeter.proto", proto_root),
            format!("{}/level_service/v1/level_service.proto", proto_root),
        ],
        &[proto_root.to_string()],
    )?;

    println!("cargo:rerun-if-changed={}", proto_root);
    Ok(())
}
