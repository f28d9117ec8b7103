//! Parameter file access port.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Section names present in the source, lowercased.
    fn sections(&self) -> Vec<String>;

    /// Key names present in `section`, lowercased.
    fn keys(&self, section: &str) -> Vec<String>;
}
