use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::iter::FromIterator;

use indexmap::IndexMap;
#[cfg(feature = "json")]
use tracing::debug;

use crate::error::ExpandError;

/// The value of a defined variable.
///
/// An undefined variable is represented by the absence of a `Value`. Members
/// of composite values are always strings; nesting cannot be expressed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    String(String),
    List(Vec<String>),
    AssociativeArray(IndexMap<String, String>),
}

/// Looks up variables by name during expansion.
pub trait Variables {
    /// Returns `Ok(None)` for an undefined variable.
    ///
    /// Stores that convert values lazily must reject nested composite values
    /// here with [`ExpandError::NestedComposite`].
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError>;
}

/// An ordered name to value store.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableBag(IndexMap<String, Value>);

impl Value {
    pub fn from_assoc<I, K, V>(iter: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Value::AssociativeArray(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn from_list<I, V>(iter: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Value::List(iter.into_iter().map(Into::into).collect())
    }

    pub fn from_string<S>(s: S) -> Value
    where
        S: Into<String>,
    {
        Value::String(s.into())
    }

    /// Builds a composite value from keyed entries.
    ///
    /// Entries keyed exactly `"0"`, `"1"`, ... `"n-1"`, in that order, form a
    /// list. Any other key sequence forms an associative array.
    ///
    /// ```
    /// use uri_template_core::Value;
    ///
    /// let list = Value::from_entries([("0", "a"), ("1", "b")]);
    /// assert_eq!(list, Value::from_list(["a", "b"]));
    ///
    /// let assoc = Value::from_entries([("1", "b"), ("0", "a")]);
    /// assert_eq!(assoc, Value::from_assoc([("1", "b"), ("0", "a")]));
    /// ```
    pub fn from_entries<I, K, V>(iter: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: Vec<(String, String)> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if is_list_keys(entries.iter().map(|(k, _)| k.as_str())) {
            Value::List(entries.into_iter().map(|(_, v)| v).collect())
        } else {
            Value::AssociativeArray(entries.into_iter().collect())
        }
    }

    /// Converts a JSON value.
    ///
    /// `null` is undefined, strings are taken verbatim and numbers and
    /// booleans by their JSON text. Arrays become lists and objects go through
    /// the same key test as [`Value::from_entries`]. `null` members of a
    /// composite are skipped.
    #[cfg(feature = "json")]
    pub fn from_json(name: &str, json: &serde_json::Value) -> Result<Option<Value>, ExpandError> {
        use serde_json::Value as Json;

        match json {
            Json::Array(items) => {
                let items = items
                    .iter()
                    .filter_map(|item| json_member(name, item).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Value::List(items)))
            }
            Json::Object(map) => {
                let is_list = is_list_keys(map.keys().map(String::as_str));
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    if let Some(v) = json_member(name, v)? {
                        entries.push((k.clone(), v));
                    }
                }
                if is_list {
                    Ok(Some(Value::List(
                        entries.into_iter().map(|(_, v)| v).collect(),
                    )))
                } else {
                    Ok(Some(Value::AssociativeArray(entries.into_iter().collect())))
                }
            }
            _ => json_member(name, json).map(|s| s.map(Value::String)),
        }
    }
}

fn is_list_keys<'a, I>(keys: I) -> bool
where
    I: Iterator<Item = &'a str>,
{
    keys.enumerate().all(|(i, k)| k == i.to_string())
}

#[cfg(feature = "json")]
fn json_member(name: &str, json: &serde_json::Value) -> Result<Option<String>, ExpandError> {
    use serde_json::Value as Json;

    match json {
        Json::Null => Ok(None),
        Json::Bool(b) => Ok(Some(b.to_string())),
        Json::Number(n) => Ok(Some(n.to_string())),
        Json::String(s) => Ok(Some(s.clone())),
        Json::Array(_) | Json::Object(_) => {
            debug!(variable = name, "rejected nested composite value");
            Err(ExpandError::NestedComposite(name.to_string()))
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl From<IndexMap<String, String>> for Value {
    fn from(m: IndexMap<String, String>) -> Self {
        Value::AssociativeArray(m)
    }
}

impl VariableBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts every member of a JSON object, failing on the first nested
    /// composite value.
    #[cfg(feature = "json")]
    pub fn from_json(
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ExpandError> {
        let mut bag = VariableBag::new();
        for (k, v) in map {
            bag.set_json(k.as_str(), v)?;
        }
        Ok(bag)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn set<K, V>(&mut self, k: K, v: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(k.into(), v.into());
        self
    }

    pub fn set_assoc<K1, V1, K2, V2>(&mut self, k1: K1, iter: V1) -> &mut Self
    where
        K1: Into<String>,
        V1: IntoIterator<Item = (K2, V2)>,
        K2: Into<String>,
        V2: Into<String>,
    {
        self.set(k1, Value::from_assoc(iter))
    }

    pub fn set_entries<K1, V1, K2, V2>(&mut self, k1: K1, iter: V1) -> &mut Self
    where
        K1: Into<String>,
        V1: IntoIterator<Item = (K2, V2)>,
        K2: Into<String>,
        V2: Into<String>,
    {
        self.set(k1, Value::from_entries(iter))
    }

    pub fn set_list<K1, V1, V2>(&mut self, k: K1, iter: V1) -> &mut Self
    where
        K1: Into<String>,
        V1: IntoIterator<Item = V2>,
        V2: Into<String>,
    {
        self.set(k, Value::from_list(iter))
    }

    pub fn set_string<K, V>(&mut self, k: K, v: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set(k, Value::from_string(v))
    }

    /// Sets a variable from JSON; `null` removes it.
    #[cfg(feature = "json")]
    pub fn set_json<K>(&mut self, k: K, json: &serde_json::Value) -> Result<&mut Self, ExpandError>
    where
        K: Into<String>,
    {
        let k = k.into();
        match Value::from_json(&k, json)? {
            Some(v) => {
                self.0.insert(k, v);
            }
            None => {
                self.0.shift_remove(&k);
            }
        }
        Ok(self)
    }
}

impl<K> FromIterator<(K, Value)> for VariableBag
where
    K: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
    {
        VariableBag(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K> Extend<(K, Value)> for VariableBag
where
    K: Into<String>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, Value)>,
    {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

impl Variables for VariableBag {
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError> {
        Ok(self.0.get(name).map(Cow::Borrowed))
    }
}

impl<S> Variables for HashMap<String, Value, S>
where
    S: BuildHasher,
{
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError> {
        Ok(self.get(name).map(Cow::Borrowed))
    }
}

impl<S> Variables for IndexMap<String, Value, S>
where
    S: BuildHasher,
{
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError> {
        Ok(self.get(name).map(Cow::Borrowed))
    }
}

impl Variables for Vec<(String, Value)> {
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError> {
        Ok(self
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| Cow::Borrowed(v)))
    }
}

#[cfg(feature = "json")]
impl Variables for serde_json::Map<String, serde_json::Value> {
    fn fetch(&self, name: &str) -> Result<Option<Cow<'_, Value>>, ExpandError> {
        match self.get(name) {
            None => Ok(None),
            Some(json) => Ok(Value::from_json(name, json)?.map(Cow::Owned)),
        }
    }
}
