//! Processor registry.
//!
//! The registry is populated once during start-up and then frozen behind an
//! `Arc` owned by the [`Dispatcher`](crate::Dispatcher). Registration takes
//! `&mut self`, so nothing can change it while requests are being served.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::processor::{Processor, SharedProcessor};

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the earlier processor (logged at warn level).
    #[default]
    Replace,
    /// Keep the earlier processor and fail the registration.
    Reject,
}

/// Name-to-processor lookup table.
#[derive(Default)]
pub struct ProcessorRegistry {
    /// Map of processor name to processor instance.
    processors: HashMap<String, SharedProcessor>,
    /// Duplicate registration policy.
    policy: DuplicatePolicy,
}

impl ProcessorRegistry {
    /// Creates a new empty registry that replaces duplicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty registry with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            processors: HashMap::new(),
            policy,
        }
    }

    /// Returns the duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Registers a processor under `name`.
    pub fn register<P>(&mut self, name: impl Into<String>, processor: P) -> RegistryResult<()>
    where
        P: Processor + 'static,
    {
        self.register_shared(name, Arc::new(processor))
    }

    /// Registers an already shared processor under `name`.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        processor: SharedProcessor,
    ) -> RegistryResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if self.processors.contains_key(&name) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(RegistryError::DuplicateName { name });
                }
                DuplicatePolicy::Replace => {
                    warn!(processor = %name, "Processor already registered, replacing it");
                }
            }
        }

        self.processors.insert(name.clone(), processor);
        info!(processor = %name, "Processor registered successfully");
        Ok(())
    }

    /// Registers a value whose type is only known at run time.
    ///
    /// The value must be a [`SharedProcessor`]; anything else fails with
    /// [`RegistryError::TypeKind`] and leaves the registry unchanged.
    pub fn register_erased<T>(&mut self, name: impl Into<String>, value: T) -> RegistryResult<()>
    where
        T: Any + Send + Sync,
    {
        let name = name.into();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<SharedProcessor>() {
            Ok(processor) => self.register_shared(name, *processor),
            Err(_) => Err(RegistryError::TypeKind {
                name,
                got: std::any::type_name::<T>(),
            }),
        }
    }

    /// Gets a processor by name.
    pub fn get(&self, name: &str) -> Option<SharedProcessor> {
        self.processors.get(name).cloned()
    }

    /// Returns whether a processor is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    /// Returns all registered processor names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.processors.keys().cloned().collect()
    }

    /// Returns the number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("names", &self.names())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessResult;
    use crate::processor::Payload;
    use async_trait::async_trait;

    struct Constant(&'static str);

    #[async_trait]
    impl Processor for Constant {
        async fn process(&self, _input: &Payload) -> ProcessResult<Payload> {
            let mut out = Payload::new();
            out.insert("value".into(), self.0.into());
            Ok(out)
        }
    }

    #[test]
    fn test_get_returns_registered_instance() {
        let mut registry = ProcessorRegistry::new();
        let processor: SharedProcessor = Arc::new(Constant("a"));
        registry
            .register_shared("app", Arc::clone(&processor))
            .unwrap();

        let found = registry.get("app").unwrap();
        assert!(Arc::ptr_eq(&found, &processor));
    }

    #[test]
    fn test_get_unregistered_returns_none() {
        let registry = ProcessorRegistry::new();
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = ProcessorRegistry::new();
        registry.register("App", Constant("a")).unwrap();
        assert!(registry.contains("App"));
        assert!(!registry.contains("app"));
    }

    #[test]
    fn test_replace_policy_keeps_last_instance() {
        let mut registry = ProcessorRegistry::new();
        let first: SharedProcessor = Arc::new(Constant("first"));
        let second: SharedProcessor = Arc::new(Constant("second"));
        registry.register_shared("app", Arc::clone(&first)).unwrap();
        registry.register_shared("app", Arc::clone(&second)).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("app").unwrap(), &second));
    }

    #[test]
    fn test_reject_policy_keeps_first_instance() {
        let mut registry = ProcessorRegistry::with_policy(DuplicatePolicy::Reject);
        let first: SharedProcessor = Arc::new(Constant("first"));
        registry.register_shared("app", Arc::clone(&first)).unwrap();

        let result = registry.register("app", Constant("second"));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateName { name: "app".into() })
        );
        assert!(Arc::ptr_eq(&registry.get("app").unwrap(), &first));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ProcessorRegistry::new();
        assert_eq!(
            registry.register("", Constant("a")),
            Err(RegistryError::EmptyName)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_erased_rejects_non_processor() {
        let mut registry = ProcessorRegistry::new();
        registry.register("app", Constant("a")).unwrap();

        let result = registry.register_erased("app", String::from("not a processor"));
        assert!(matches!(
            result,
            Err(RegistryError::TypeKind { ref name, got }) if name == "app" && got.contains("String")
        ));

        // existing entry untouched
        assert_eq!(registry.len(), 1);
        assert!(registry.get("app").is_some());
    }

    #[test]
    fn test_register_erased_accepts_shared_processor() {
        let mut registry = ProcessorRegistry::new();
        let processor: SharedProcessor = Arc::new(Constant("a"));
        registry
            .register_erased("app", Arc::clone(&processor))
            .unwrap();
        assert!(Arc::ptr_eq(&registry.get("app").unwrap(), &processor));
    }

    #[test]
    fn test_names_lists_everything() {
        let mut registry = ProcessorRegistry::new();
        registry.register("a", Constant("a")).unwrap();
        registry.register("b", Constant("b")).unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
