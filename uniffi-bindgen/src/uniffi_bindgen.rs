//! Generates foreign-language bindings for `walletstore-core`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
