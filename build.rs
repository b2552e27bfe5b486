fn main() {
    std::env::set_var("PROTOC", protobuf_src::protoc());
    prost_build::compile_protos(&["proto/transport_catalogue.proto"], &["proto/"])
        .expect("failed to compile transport_catalogue.proto");
}
