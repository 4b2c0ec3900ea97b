// This binary crate is intentionally minimal.
// All training-harness logic lives in the library (src/lib.rs and its modules).
// Run demos with:
//   cargo run --example xor
fn main() {
    println!("kiln: a training and evaluation harness for neural networks.");
    println!("Run `cargo run --example xor` to see the XOR training demo.");
}
