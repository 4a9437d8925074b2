use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::AppError;

type Instance = Arc<dyn Any + Send + Sync>;

/// Application-scoped registry of shared services keyed by type.
#[derive(Default)]
pub struct Container {
    instances: RwLock<HashMap<TypeId, Instance>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("services", &self.instances.read().len()).finish()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance`, replacing a previous instance of the same type.
    pub fn register<T: Any + Send + Sync>(&self, instance: T) {
        self.register_shared(Arc::new(instance));
    }

    pub fn register_shared<T: Any + Send + Sync>(&self, instance: Arc<T>) {
        self.instances.write().insert(TypeId::of::<T>(), instance);
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>, AppError> {
        let instance = self
            .instances
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or(AppError::ServiceNotRegistered(type_name::<T>()))?;

        instance.downcast::<T>().map_err(|_| AppError::ServiceNotRegistered(type_name::<T>()))
    }

    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.instances.read().contains_key(&TypeId::of::<T>())
    }

    /// Remove the instance of `T`. Returns whether one was registered.
    pub fn remove<T: Any + Send + Sync>(&self) -> bool {
        self.instances.write().remove(&TypeId::of::<T>()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Mailer {
        host: &'static str,
    }

    #[test]
    fn services_resolve_by_type() {
        let container = Container::new();
        container.register(Mailer { host: "smtp.example.org" });

        assert!(container.has::<Mailer>());
        assert_eq!(container.get::<Mailer>().unwrap().host, "smtp.example.org");
        let first = container.get::<Mailer>().unwrap();
        assert!(Arc::ptr_eq(&first, &container.get::<Mailer>().unwrap()));
    }

    #[test]
    fn unregistered_types_are_an_error() {
        let container = Container::new();
        let err = container.get::<Mailer>().unwrap_err();

        assert!(matches!(err, AppError::ServiceNotRegistered(name) if name.ends_with("Mailer")));
        assert!(!container.remove::<Mailer>());
    }
}
