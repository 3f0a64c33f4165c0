//! Typed argument bag carried by a flow context.

use super::error::ContextError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Name of a context argument together with the type stored under it.
///
/// Keys are declared once, next to the screen that writes them, and shared
/// with the screens that read them:
///
/// ```rust
/// use navflow::context::{ArgKey, ContextArgs};
///
/// pub const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");
///
/// let mut args = ContextArgs::new();
/// args.put(&LOGIN, "grace".to_string()).unwrap();
/// assert_eq!(args.get(&LOGIN).unwrap(), "grace");
/// ```
pub struct ArgKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArgKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ArgKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArgKey<T> {}

impl<T> fmt::Debug for ArgKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgKey({})", self.name)
    }
}

/// Key/value store of the arguments a flow passes between states.
///
/// Values are kept in their JSON form so that any serde type can be stored
/// and the whole bag can be checkpointed. Reads go through a typed
/// [`ArgKey`]; reading with the wrong type yields
/// [`ContextError::TypeMismatch`] rather than a panic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextArgs {
    values: BTreeMap<String, Value>,
}

impl ContextArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn put<T: Serialize>(&mut self, key: &ArgKey<T>, value: T) -> Result<(), ContextError> {
        let encoded = serde_json::to_value(value).map_err(|e| ContextError::Encoding {
            key: key.name().to_string(),
            message: e.to_string(),
        })?;
        self.values.insert(key.name().to_string(), encoded);
        Ok(())
    }

    /// Read the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &ArgKey<T>) -> Result<T, ContextError> {
        let value = self
            .values
            .get(key.name())
            .ok_or_else(|| ContextError::NotFound {
                key: key.name().to_string(),
            })?;

        T::deserialize(value).map_err(|e| ContextError::TypeMismatch {
            key: key.name().to_string(),
            message: e.to_string(),
        })
    }

    /// Like [`get`](Self::get), treating a missing or mistyped value as absent.
    pub fn find<T: DeserializeOwned>(&self, key: &ArgKey<T>) -> Option<T> {
        self.get(key).ok()
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove<T>(&mut self, key: &ArgKey<T>) -> bool {
        self.values.remove(key.name()).is_some()
    }

    pub fn contains<T>(&self, key: &ArgKey<T>) -> bool {
        self.values.contains_key(key.name())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Encode every value to its JSON text, for formats that cannot carry
    /// self-describing values.
    pub fn encode(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(encoded: &BTreeMap<String, String>) -> Result<Self, ContextError> {
        let mut values = BTreeMap::new();
        for (key, text) in encoded {
            let value = serde_json::from_str(text).map_err(|e| ContextError::Encoding {
                key: key.clone(),
                message: e.to_string(),
            })?;
            values.insert(key.clone(), value);
        }
        Ok(Self { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");
    const ATTEMPTS: ArgKey<u32> = ArgKey::new("ATTEMPTS");
    const LOGIN_AS_NUMBER: ArgKey<u32> = ArgKey::new("LOGIN");

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        admin: bool,
    }

    const PROFILE: ArgKey<Profile> = ArgKey::new("PROFILE");

    #[test]
    fn put_then_get_returns_value() {
        let mut args = ContextArgs::new();
        args.put(&LOGIN, "ada".to_string()).unwrap();
        args.put(&ATTEMPTS, 3).unwrap();

        assert_eq!(args.get(&LOGIN).unwrap(), "ada");
        assert_eq!(args.get(&ATTEMPTS).unwrap(), 3);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn structured_values_are_supported() {
        let mut args = ContextArgs::new();
        let profile = Profile {
            name: "ada".to_string(),
            admin: true,
        };
        args.put(&PROFILE, profile.clone()).unwrap();

        assert_eq!(args.get(&PROFILE).unwrap(), profile);
    }

    #[test]
    fn missing_key_is_not_found() {
        let args = ContextArgs::new();

        assert!(matches!(
            args.get(&LOGIN),
            Err(ContextError::NotFound { key }) if key == "LOGIN"
        ));
        assert_eq!(args.find(&LOGIN), None);
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let mut args = ContextArgs::new();
        args.put(&LOGIN, "ada".to_string()).unwrap();

        assert!(matches!(
            args.get(&LOGIN_AS_NUMBER),
            Err(ContextError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn remove_and_clear() {
        let mut args = ContextArgs::new();
        args.put(&LOGIN, "ada".to_string()).unwrap();
        args.put(&ATTEMPTS, 1).unwrap();

        assert!(args.remove(&LOGIN));
        assert!(!args.remove(&LOGIN));
        assert!(!args.contains(&LOGIN));
        assert!(args.contains(&ATTEMPTS));

        args.clear();
        assert!(args.is_empty());
    }

    #[test]
    fn encode_and_decode_preserve_values() {
        let mut args = ContextArgs::new();
        args.put(&LOGIN, "ada".to_string()).unwrap();
        args.put(&ATTEMPTS, 7).unwrap();

        let encoded = args.encode();
        assert_eq!(encoded.get("LOGIN").map(String::as_str), Some("\"ada\""));

        let decoded = ContextArgs::decode(&encoded).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let mut encoded = BTreeMap::new();
        encoded.insert("LOGIN".to_string(), "{not json".to_string());

        assert!(matches!(
            ContextArgs::decode(&encoded),
            Err(ContextError::Encoding { .. })
        ));
    }
}
