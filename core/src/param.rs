//! Parameter declarations.
//!
//! A [`ParameterDescriptor`] describes one named (`-x` / `--name`) or
//! positional parameter and holds its bound value after a successful bind.
//! Descriptors are shared through [`Param<T>`] handles so the code that
//! declares a parameter can read the typed value back inside its handler.
//!
//! # Examples
//!
//! ```
//! use verbtree_core::{Param, ParameterSet, ValueType};
//!
//! let name = Param::<String>::positional("name", 0)
//!     .help("Who to greet")
//!     .build();
//! let loud = Param::<bool>::named("--loud").alias("-l").build();
//!
//! assert!(name.descriptor().is_required());
//! // A named bool without a default is a flag defaulting to false.
//! assert!(!loud.descriptor().is_required());
//! assert_eq!(loud.descriptor().value_type(), &ValueType::Bool);
//!
//! let params = ParameterSet::new().with(&name).with(&loud);
//! assert_eq!(params.own().len(), 2);
//! ```

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{ParamValue, Value, ValueType};
use crate::validate::NameKind;

/// Whether a parameter is matched by name or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Named,
    Positional { index: usize },
}

impl ParameterKind {
    /// Grammar the parameter's names are validated against.
    pub fn name_kind(self) -> NameKind {
        match self {
            ParameterKind::Named => NameKind::Named,
            ParameterKind::Positional { .. } => NameKind::Positional,
        }
    }
}

/// One declared parameter plus its per-invocation bound value.
#[derive(Debug)]
pub struct ParameterDescriptor {
    primary_name: String,
    aliases: Vec<String>,
    kind: ParameterKind,
    value_type: ValueType,
    default_value: Option<Value>,
    help: Option<String>,
    allow_reserved: bool,
    bound: Mutex<Option<Value>>,
}

impl ParameterDescriptor {
    fn new(primary_name: &str, kind: ParameterKind, value_type: ValueType) -> Self {
        Self {
            primary_name: primary_name.to_string(),
            aliases: Vec::new(),
            kind,
            value_type,
            default_value: None,
            help: None,
            allow_reserved: false,
            bound: Mutex::new(None),
        }
    }

    /// Name shown in help and used as the key in [`BoundArgs`](crate::BoundArgs).
    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    /// Additional names, in declaration order, without the primary name.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Primary name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Named or positional, with the positional index.
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// `true` for `-x` / `--name` parameters.
    pub fn is_named(&self) -> bool {
        self.kind == ParameterKind::Named
    }

    /// Position among positional tokens; `None` for named parameters.
    pub fn position_index(&self) -> Option<usize> {
        match self.kind {
            ParameterKind::Positional { index } => Some(index),
            ParameterKind::Named => None,
        }
    }

    /// Type raw tokens are converted to.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Value bound when the parameter is omitted; `None` means required.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// A parameter is required exactly when it has no default.
    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }

    /// One-line description shown in help output.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the reserved help names may be used by this parameter.
    pub fn allow_reserved(&self) -> bool {
        self.allow_reserved
    }

    /// A named bool parameter takes its value only from an attached `=value`.
    pub fn is_flag(&self) -> bool {
        self.is_named() && self.value_type == ValueType::Bool
    }

    /// Returns `true` if `token` equals the primary name or an alias.
    pub fn matches(&self, token: &str) -> bool {
        self.names().any(|n| n == token)
    }

    /// Value stored by the most recent successful bind.
    pub fn bound_value(&self) -> Option<Value> {
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_bound(&self, value: Value) {
        *self.bound.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub(crate) fn clear_bound(&self) {
        *self.bound.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Typed handle to a shared [`ParameterDescriptor`].
pub struct Param<T> {
    descriptor: Arc<ParameterDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&self.descriptor).finish()
    }
}

impl<T: ParamValue> Param<T> {
    /// Starts declaring a named parameter (`-x` or `--name`).
    pub fn named(name: &str) -> ParamBuilder<T> {
        ParamBuilder::new(name, ParameterKind::Named)
    }

    /// Starts declaring a positional parameter at `index`.
    pub fn positional(name: &str, index: usize) -> ParamBuilder<T> {
        ParamBuilder::new(name, ParameterKind::Positional { index })
    }

    /// Bound value of the current invocation, read as `T`.
    pub fn value(&self) -> Option<T> {
        self.descriptor
            .bound_value()
            .as_ref()
            .and_then(T::from_value)
    }

    /// Shared descriptor, as registered on commands.
    pub fn descriptor(&self) -> &Arc<ParameterDescriptor> {
        &self.descriptor
    }
}

/// Builder returned by [`Param::named`] and [`Param::positional`].
#[derive(Debug)]
pub struct ParamBuilder<T> {
    descriptor: ParameterDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ParamValue> ParamBuilder<T> {
    fn new(name: &str, kind: ParameterKind) -> Self {
        Self {
            descriptor: ParameterDescriptor::new(name, kind, T::value_type()),
            _marker: PhantomData,
        }
    }

    /// Adds an alternative name. Repeated aliases are ignored.
    pub fn alias(mut self, alias: &str) -> Self {
        if !self.descriptor.matches(alias) {
            self.descriptor.aliases.push(alias.to_string());
        }
        self
    }

    /// Makes the parameter optional, binding `value` when it is omitted.
    pub fn default_value(mut self, value: T) -> Self {
        self.descriptor.default_value = Some(value.into_value());
        self
    }

    /// Sets the help text.
    pub fn help(mut self, text: &str) -> Self {
        self.descriptor.help = Some(text.to_string());
        self
    }

    /// Permits one of the reserved help names (`-h`, `--help`, ...).
    ///
    /// This only relaxes name validation. [`relocate_help_tokens`] still
    /// treats every reserved token on the command line as a help request
    /// before binding, so when run through a dispatcher such a name prints
    /// help instead of binding. Binding the descriptors directly with
    /// [`bind`] does see the option.
    ///
    /// [`relocate_help_tokens`]: crate::relocate_help_tokens
    /// [`bind`]: crate::bind
    pub fn allow_reserved(mut self) -> Self {
        self.descriptor.allow_reserved = true;
        self
    }

    /// Finishes the declaration. A named `bool` without a default gets
    /// `false`.
    pub fn build(mut self) -> Param<T> {
        if self.descriptor.is_flag() && self.descriptor.default_value.is_none() {
            self.descriptor.default_value = Some(Value::Bool(false));
        }
        Param {
            descriptor: Arc::new(self.descriptor),
            _marker: PhantomData,
        }
    }
}

impl ParamBuilder<String> {
    /// Restricts the parameter to a fixed set of values.
    pub fn choices(mut self, choices: &[&str]) -> Self {
        self.descriptor.value_type =
            ValueType::Choice(choices.iter().map(|c| (*c).to_string()).collect());
        self
    }
}

/// Ordered registration container for a command's parameters.
///
/// A set may inherit from a shared parent set (for instance global options
/// used by several commands). Discovery walks the set and then each ancestor.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    own: Vec<Arc<ParameterDescriptor>>,
    parent: Option<Arc<ParameterSet>>,
}

impl ParameterSet {
    /// Empty set without a parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter declared directly on this set.
    pub fn with<T>(mut self, param: &Param<T>) -> Self {
        self.push(Arc::clone(&param.descriptor));
        self
    }

    /// Sets the parent set whose parameters are inherited.
    pub fn inherit(mut self, parent: Arc<ParameterSet>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Appends a shared descriptor in declaration order.
    pub fn push(&mut self, descriptor: Arc<ParameterDescriptor>) {
        self.own.push(descriptor);
    }

    /// Parameters declared directly on this set.
    pub fn own(&self) -> &[Arc<ParameterDescriptor>] {
        &self.own
    }

    /// Inherited set, if any.
    pub fn parent(&self) -> Option<&Arc<ParameterSet>> {
        self.parent.as_ref()
    }

    /// This set followed by each ancestor, nearest first.
    pub fn chain(&self) -> impl Iterator<Item = &ParameterSet> {
        std::iter::successors(Some(self), |set| set.parent.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_bool_gets_false_default() {
        let flag = Param::<bool>::named("--force").build();
        assert_eq!(flag.descriptor().default_value(), Some(&Value::Bool(false)));
        assert!(flag.descriptor().is_flag());
    }

    #[test]
    fn test_positional_bool_stays_required() {
        let p = Param::<bool>::positional("enabled", 0).build();
        assert!(p.descriptor().is_required());
        assert!(!p.descriptor().is_flag());
    }

    #[test]
    fn test_explicit_default_is_kept() {
        let p = Param::<bool>::named("--color").default_value(true).build();
        assert_eq!(p.descriptor().default_value(), Some(&Value::Bool(true)));

        let port = Param::<u16>::named("--port").default_value(8080).build();
        assert_eq!(port.descriptor().default_value(), Some(&Value::UInt(8080)));
        assert!(!port.descriptor().is_required());
    }

    #[test]
    fn test_alias_deduplicated() {
        let p = Param::<String>::named("--output")
            .alias("-o")
            .alias("-o")
            .alias("--output")
            .build();
        assert_eq!(p.descriptor().aliases(), &["-o".to_string()]);
        assert!(p.descriptor().matches("-o"));
        assert!(p.descriptor().matches("--output"));
        assert!(!p.descriptor().matches("--out"));
    }

    #[test]
    fn test_value_reads_bound_state() {
        let p = Param::<i32>::named("--count").build();
        assert_eq!(p.value(), None);
        p.descriptor().set_bound(Value::Int(3));
        assert_eq!(p.value(), Some(3));
        p.descriptor().clear_bound();
        assert_eq!(p.value(), None);
    }

    #[test]
    fn test_chain_walks_ancestors() {
        let verbose = Param::<bool>::named("--verbose").build();
        let name = Param::<String>::positional("name", 0).build();
        let global = Arc::new(ParameterSet::new().with(&verbose));
        let set = ParameterSet::new().with(&name).inherit(global);

        let names: Vec<&str> = set
            .chain()
            .flat_map(|s| s.own().iter().map(|d| d.primary_name()))
            .collect();
        assert_eq!(names, vec!["name", "--verbose"]);
    }
}
