//! Argument binding.
//!
//! [`bind`] matches the tokens left after verb resolution against a
//! command's parameters, converts them to their declared types, applies
//! defaults and stores the results on the descriptors.
//!
//! Grammar:
//!
//! - a token equal to a declared name or alias is a named occurrence; a
//!   value-taking option consumes the next token, a bool flag does not;
//! - `--name=value` / `-n=value` attach the value directly;
//! - `--` ends option parsing, every later token is positional;
//! - an unknown token that looks like an option (leading `-`, not a number)
//!   is rejected, so combined short flags such as `-ab` are not expanded;
//! - anything else is positional, matched by ascending index.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use verbtree_core::{Param, ParameterSet, bind, discover};
//!
//! let name = Param::<String>::positional("name", 0).build();
//! let loud = Param::<bool>::named("--loud").alias("-l").build();
//! let times = Param::<u32>::named("--times").default_value(1).build();
//! let params = discover(&ParameterSet::new().with(&name).with(&loud).with(&times)).unwrap();
//!
//! let tokens: Vec<String> = ["Ada", "-l", "--times=3"].map(String::from).to_vec();
//! let args = bind(&params, &tokens).unwrap();
//!
//! assert_eq!(args.get(&name).as_deref(), Some("Ada"));
//! assert_eq!(args.get(&loud), Some(true));
//! assert_eq!(times.value(), Some(3));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::BindingError;
use crate::param::{Param, ParameterDescriptor};
use crate::types::{ParamValue, Value};

/// Marker that ends option parsing.
pub const END_OF_OPTIONS: &str = "--";

/// Values bound for one invocation, keyed by primary parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    /// Typed value of `param`; `None` if it is not part of this invocation.
    pub fn get<T: ParamValue>(&self, param: &Param<T>) -> Option<T> {
        self.value(param.descriptor().primary_name())
            .and_then(T::from_value)
    }

    /// Raw value by primary name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

enum Occurrence<'t> {
    /// Bool flag given without a value.
    Present,
    Text(&'t str),
}

/// Binds `tokens` to `parameters`.
///
/// Every descriptor's bound value is cleared first and only set when the
/// whole bind succeeds. Missing parameters are reported before conversion
/// failures.
pub fn bind(
    parameters: &[Arc<ParameterDescriptor>],
    tokens: &[String],
) -> Result<BoundArgs, BindingError> {
    for descriptor in parameters {
        descriptor.clear_bound();
    }

    let mut named: HashMap<usize, Occurrence<'_>> = HashMap::new();
    let mut positional: Vec<&str> = Vec::new();
    let mut options_done = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        i += 1;

        if options_done {
            positional.push(token);
            continue;
        }
        if token == END_OF_OPTIONS {
            options_done = true;
            continue;
        }

        let Some((slot, attached)) = match_named(parameters, token) else {
            if looks_like_option(token) {
                let head = token.split_once('=').map_or(token, |(head, _)| head);
                return Err(BindingError::UnknownOption(head.to_string()));
            }
            positional.push(token);
            continue;
        };

        let descriptor = &parameters[slot];
        if named.contains_key(&slot) {
            return Err(BindingError::RepeatedOption(
                descriptor.primary_name().to_string(),
            ));
        }

        let occurrence = match attached {
            Some(value) => Occurrence::Text(value),
            None if descriptor.is_flag() => Occurrence::Present,
            None => match tokens.get(i) {
                Some(next) if next != END_OF_OPTIONS && match_named(parameters, next).is_none() => {
                    i += 1;
                    Occurrence::Text(next.as_str())
                }
                _ => {
                    return Err(BindingError::MissingValue(
                        descriptor.primary_name().to_string(),
                    ));
                }
            },
        };
        named.insert(slot, occurrence);
    }

    let mut slots: Vec<(usize, usize)> = parameters
        .iter()
        .enumerate()
        .filter_map(|(slot, d)| d.position_index().map(|index| (index, slot)))
        .collect();
    slots.sort_unstable();

    if positional.len() > slots.len() {
        return Err(BindingError::TooManyPositionalArguments(
            positional[slots.len()].to_string(),
        ));
    }

    let mut occurrences: HashMap<usize, Occurrence<'_>> = named;
    for ((_, slot), token) in slots.iter().zip(positional) {
        occurrences.insert(*slot, Occurrence::Text(token));
    }

    for (slot, descriptor) in parameters.iter().enumerate() {
        if !occurrences.contains_key(&slot) && descriptor.is_required() {
            return Err(BindingError::MissingRequiredParameter(
                descriptor.primary_name().to_string(),
            ));
        }
    }

    let mut values = Vec::with_capacity(parameters.len());
    for (slot, descriptor) in parameters.iter().enumerate() {
        let value = match occurrences.get(&slot) {
            Some(Occurrence::Present) => Value::Bool(true),
            Some(Occurrence::Text(raw)) => descriptor.value_type().parse(raw).map_err(|e| {
                BindingError::InvalidValueFormat {
                    name: descriptor.primary_name().to_string(),
                    raw: (*raw).to_string(),
                    reason: e.reason,
                }
            })?,
            None => match descriptor.default_value() {
                Some(default) => default.clone(),
                None => {
                    return Err(BindingError::MissingRequiredParameter(
                        descriptor.primary_name().to_string(),
                    ));
                }
            },
        };
        values.push((descriptor.primary_name().to_string(), value));
    }

    for (descriptor, (_, value)) in parameters.iter().zip(&values) {
        descriptor.set_bound(value.clone());
    }

    debug!(bound = values.len(), positional = slots.len(), "Bound arguments");

    Ok(BoundArgs { values })
}

/// Finds the named parameter `token` refers to, with any `=value` suffix.
fn match_named<'t>(
    parameters: &[Arc<ParameterDescriptor>],
    token: &'t str,
) -> Option<(usize, Option<&'t str>)> {
    let find = |name: &str| {
        parameters
            .iter()
            .position(|d| d.is_named() && d.matches(name))
    };

    if let Some(slot) = find(token) {
        return Some((slot, None));
    }

    let (head, value) = token.split_once('=')?;
    find(head).map(|slot| (slot, Some(value)))
}

/// A leading dash marks an option unless the token is a lone `-` or a number.
fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}
