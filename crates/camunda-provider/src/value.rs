//! Three-valued configuration fields

/// A configuration value as seen by the host while planning.
///
/// `Unknown` means the value depends on something not computed yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigValue<T> {
    Known(T),
    #[default]
    Null,
    Unknown,
}

impl<T> ConfigValue<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, ConfigValue::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ConfigValue::Unknown)
    }

    /// The concrete value, if there is one
    pub fn known(&self) -> Option<&T> {
        match self {
            ConfigValue::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            ConfigValue::Known(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for ConfigValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => ConfigValue::Known(v),
            None => ConfigValue::Null,
        }
    }
}

impl From<&str> for ConfigValue<String> {
    fn from(value: &str) -> Self {
        ConfigValue::Known(value.to_string())
    }
}

impl From<String> for ConfigValue<String> {
    fn from(value: String) -> Self {
        ConfigValue::Known(value)
    }
}

impl From<bool> for ConfigValue<bool> {
    fn from(value: bool) -> Self {
        ConfigValue::Known(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        assert_eq!(ConfigValue::from(Some(1)), ConfigValue::Known(1));
        assert_eq!(ConfigValue::<i32>::from(None), ConfigValue::Null);
    }

    #[test]
    fn test_known_accessors() {
        let value: ConfigValue<String> = "x".into();
        assert!(value.is_known());
        assert_eq!(value.known().map(String::as_str), Some("x"));

        let unknown: ConfigValue<String> = ConfigValue::Unknown;
        assert!(unknown.is_unknown());
        assert!(unknown.known().is_none());
        assert!(ConfigValue::<bool>::default().is_null());
    }
}
