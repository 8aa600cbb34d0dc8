use std::env;

fn main() {
    // The ESP-IDF linker arguments are only needed by the bring-up binary
    if env::var_os("CARGO_FEATURE_ESP").is_some() {
        embuild::espidf::sysenv::output();
    }
}
