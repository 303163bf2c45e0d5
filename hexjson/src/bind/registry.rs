//! TypeId -> descriptors / compiled procedure cache

use core::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use hexjson_value::{JsonArray, JsonObject};
use parking_lot::{Mutex, RwLock};

use super::{BindingError, Describe, Linker, Procedure, TypeDescriptors};
use crate::Error;
use crate::tracing_macros::debug;

/// Where a type is in its one-way trip to a cached procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Never requested
    Unresolved,
    /// Descriptors are being resolved
    Resolving,
    /// Descriptors are cached; the procedure is not committed yet
    Compiling,
    /// The procedure is cached for the life of the registry
    Ready,
    /// Resolution or compilation failed; the error is cached
    Failed,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Owner of the per-type descriptor and procedure caches.
///
/// Lookups of ready types only take read locks. First-time builds are
/// serialized behind a single build lock and re-check the cache once they
/// hold it, so each type is resolved and compiled exactly once and every
/// caller sees the same [`Procedure`].
pub struct Registry {
    descriptors: RwLock<HashMap<TypeId, Arc<TypeDescriptors>>>,
    procedures: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    failures: RwLock<HashMap<TypeId, BindingError>>,
    states: RwLock<HashMap<TypeId, BindState>>,
    build_lock: Mutex<()>,
    compiled: AtomicUsize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            descriptors: RwLock::new(HashMap::new()),
            procedures: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            states: RwLock::new(HashMap::new()),
            build_lock: Mutex::new(()),
            compiled: AtomicUsize::new(0),
        }
    }

    /// The process-wide registry used by [`crate::from_str`] and friends.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Where `T` is in its build.
    pub fn state<T: Describe>(&self) -> BindState {
        self.states
            .read()
            .get(&TypeId::of::<T>())
            .copied()
            .unwrap_or(BindState::Unresolved)
    }

    /// How many procedures this registry has compiled.
    pub fn compiled_count(&self) -> usize {
        self.compiled.load(Ordering::Acquire)
    }

    /// The field-binding descriptors of `T`, resolving them on first use.
    pub fn descriptors<T: Describe>(&self) -> Result<Arc<TypeDescriptors>, BindingError> {
        let id = TypeId::of::<T>();
        if let Some(descriptors) = self.cached_descriptors(id) {
            return Ok(descriptors);
        }
        if let Some(err) = self.cached_failure(id) {
            return Err(err);
        }
        let _build = self.build_lock.lock();
        let mut linker = Linker::new(self);
        linker.descriptors(T::shape())
    }

    /// The compiled procedure of `T`, building it on first use.
    pub fn procedure<T: Describe>(&self) -> Result<Arc<Procedure<T>>, BindingError> {
        let id = TypeId::of::<T>();
        if let Some(procedure) = self.cached_procedure::<T>() {
            return Ok(procedure);
        }
        if let Some(err) = self.cached_failure(id) {
            return Err(err);
        }
        let _build = self.build_lock.lock();
        // Another thread may have finished the build while we waited.
        Linker::new(self).nested::<T>()
    }

    /// Convert `obj` into a `T`.
    pub fn deserialize<T: Describe>(&self, obj: &JsonObject) -> Result<T, Error> {
        Ok(self.procedure::<T>()?.call(obj)?)
    }

    /// Convert every object in `arr` into a `T`.
    pub fn deserialize_array<T: Describe>(&self, arr: &JsonArray) -> Result<Vec<T>, Error> {
        Ok(self.procedure::<T>()?.call_array(arr)?)
    }

    pub(crate) fn cached_descriptors(&self, id: TypeId) -> Option<Arc<TypeDescriptors>> {
        self.descriptors.read().get(&id).cloned()
    }

    pub(crate) fn cached_failure(&self, id: TypeId) -> Option<BindingError> {
        self.failures.read().get(&id).cloned()
    }

    pub(crate) fn cached_procedure<T: Describe>(&self) -> Option<Arc<Procedure<T>>> {
        let erased = self.procedures.read().get(&TypeId::of::<T>())?.clone();
        erased.downcast::<Procedure<T>>().ok()
    }

    pub(crate) fn set_state(&self, id: TypeId, state: BindState) {
        self.states.write().insert(id, state);
    }

    pub(crate) fn commit_descriptors(&self, id: TypeId, descriptors: Arc<TypeDescriptors>) {
        self.descriptors.write().insert(id, descriptors);
        self.set_state(id, BindState::Compiling);
    }

    pub(crate) fn record_failure(&self, id: TypeId, err: BindingError) {
        debug!(error = %err, "caching binding failure");
        self.failures.write().entry(id).or_insert(err);
        self.set_state(id, BindState::Failed);
    }

    /// Inserts the procedure unless one is already cached, and returns the
    /// cached one either way.
    pub(crate) fn commit_procedure<T: Describe>(
        &self,
        procedure: Procedure<T>,
    ) -> Arc<Procedure<T>> {
        let id = TypeId::of::<T>();
        let committed = {
            let mut procedures = self.procedures.write();
            let existing = procedures
                .get(&id)
                .cloned()
                .and_then(|erased| erased.downcast::<Procedure<T>>().ok());
            match existing {
                Some(existing) => existing,
                None => {
                    let procedure = Arc::new(procedure);
                    procedures.insert(id, procedure.clone());
                    self.compiled.fetch_add(1, Ordering::AcqRel);
                    debug!(type_name = procedure.type_name(), "committed procedure");
                    procedure
                }
            }
        };
        self.set_state(id, BindState::Ready);
        committed
    }
}
