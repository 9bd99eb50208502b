//! Configuration access port.
//!
//! Section/key lookup over an INI-style source. Values come back raw;
//! `config_validation` parses and range-checks them.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
