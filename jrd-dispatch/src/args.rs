//! Argument binding
//!
//! Request `params` reach a procedure as an [`Args`] list:
//!
//! - absent params bind to an empty list
//! - an array binds positionally, exactly as given; extra or missing entries
//!   are not checked against the procedure's declared parameters
//! - an object binds by name in the order of the procedure's declared
//!   parameters; a declared name with no matching key becomes a missing slot
//!   and keys that match no declared name are ignored
//!
//! Missing slots are kept distinct from an explicit `null` so procedures can
//! tell "not supplied" apart from "supplied as null" when they care to.

use crate::fault::Fault;
use jrd_core::Params;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Arguments bound for a single procedure call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Option<Value>>,
}

impl Args {
    /// Create an argument list, `None` marking a missing slot
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    /// Create an argument list with every slot supplied
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Bind request params against a procedure's declared parameter names
    ///
    /// ```rust
    /// use jrd_core::Params;
    /// use jrd_dispatch::Args;
    /// use serde_json::json;
    ///
    /// let formal = vec!["a".to_string(), "b".to_string()];
    /// let named = Params::from_value(json!({"b": 3, "a": 5, "c": 0})).unwrap();
    ///
    /// let args = Args::bind(Some(named), &formal);
    /// assert_eq!(args.to_value(), json!([5, 3]));
    /// ```
    pub fn bind(params: Option<Params>, formal: &[String]) -> Self {
        match params {
            None => Self::default(),
            Some(Params::Positional(values)) => Self::positional(values),
            Some(Params::Named(map)) => Self {
                values: formal.iter().map(|name| map.get(name).cloned()).collect(),
            },
        }
    }

    /// Number of bound slots, missing ones included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get an argument; `None` if out of range or missing
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Whether the slot at `index` was not supplied
    pub fn is_missing(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// Deserialize the argument at `index`
    ///
    /// A missing or out-of-range argument reads as `null`, so `Option<T>`
    /// parameters accept it. A value that does not fit `T` is an invalid
    /// params fault.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, Fault> {
        let value = self.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| Fault::invalid_params(format!("Invalid argument {}: {}", index, e)))
    }

    /// Iterate over the slots in order
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }

    /// Consume into the raw slots
    pub fn into_values(self) -> Vec<Option<Value>> {
        self.values
    }

    /// Render as a JSON array, missing slots as `null`
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.values
                .iter()
                .map(|value| value.clone().unwrap_or(Value::Null))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::positional(values)
    }
}
