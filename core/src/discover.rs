//! Parameter discovery.
//!
//! Produces the ordered, deduplicated parameter list of a command from its
//! [`ParameterSet`] and every inherited ancestor set. Registration is explicit,
//! so discovery never inspects types at run time.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::param::{ParameterDescriptor, ParameterSet};
use crate::validate::{NameValidity, validate_name};

/// Discovers the parameters reachable from `set`.
///
/// The same descriptor reached through two sets counts once. Each newly
/// found descriptor must not reuse a name already claimed in this pass.
/// The result lists positional parameters by ascending index, then named
/// parameters in discovery order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use verbtree_core::{Param, ParameterSet, discover};
///
/// let verbose = Param::<bool>::named("--verbose").build();
/// let dest = Param::<String>::positional("dest", 1).build();
/// let src = Param::<String>::positional("src", 0).build();
///
/// let global = Arc::new(ParameterSet::new().with(&verbose));
/// let set = ParameterSet::new().with(&dest).with(&src).inherit(global);
///
/// let names: Vec<String> = discover(&set)
///     .unwrap()
///     .iter()
///     .map(|d| d.primary_name().to_string())
///     .collect();
/// assert_eq!(names, ["src", "dest", "--verbose"]);
/// ```
pub fn discover(set: &ParameterSet) -> Result<Vec<Arc<ParameterDescriptor>>, ConfigError> {
    let mut seen: HashSet<*const ParameterDescriptor> = HashSet::new();
    let mut claimed: HashSet<String> = HashSet::new();
    let mut found: Vec<Arc<ParameterDescriptor>> = Vec::new();

    for descriptor in set.chain().flat_map(|s| s.own().iter()) {
        if !seen.insert(Arc::as_ptr(descriptor)) {
            continue;
        }

        check_names(descriptor)?;
        for name in descriptor.names() {
            if !claimed.insert(name.to_string()) {
                return Err(ConfigError::DuplicateParameterName(name.to_string()));
            }
        }

        found.push(Arc::clone(descriptor));
    }

    check_positions(&found)?;

    // Stable sort keeps named parameters in discovery order.
    found.sort_by_key(|d| match d.position_index() {
        Some(index) => (0, index),
        None => (1, 0),
    });

    debug!(
        parameters = ?found.iter().map(|d| d.primary_name()).collect::<Vec<_>>(),
        "Discovered parameters"
    );

    Ok(found)
}

fn check_names(descriptor: &ParameterDescriptor) -> Result<(), ConfigError> {
    let kind = descriptor.kind().name_kind();

    if descriptor.position_index().is_some() && !descriptor.aliases().is_empty() {
        return Err(ConfigError::PositionalAlias(
            descriptor.primary_name().to_string(),
        ));
    }

    for name in descriptor.names() {
        let validity = validate_name(name, kind, descriptor.allow_reserved());
        if validity != NameValidity::Valid {
            return Err(ConfigError::InvalidParameterName {
                name: name.to_string(),
                validity,
            });
        }
    }

    Ok(())
}

fn check_positions(found: &[Arc<ParameterDescriptor>]) -> Result<(), ConfigError> {
    let mut by_index: HashMap<usize, &str> = HashMap::new();
    for descriptor in found {
        if let Some(index) = descriptor.position_index() {
            if let Some(first) = by_index.insert(index, descriptor.primary_name()) {
                return Err(ConfigError::DuplicatePosition {
                    index,
                    first: first.to_string(),
                    second: descriptor.primary_name().to_string(),
                });
            }
        }
    }
    Ok(())
}
