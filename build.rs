fn main() {
    // ESP-IDF environment is only needed for the firmware build; host builds
    // (tests, fuzzing) compile without the `espidf` feature.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
