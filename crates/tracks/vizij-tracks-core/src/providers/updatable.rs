//! Callback-backed base providers.
//!
//! Each registered provider is addressed through an [`UpdatableHandle`]
//! carrying a generation. Disposing a handle bumps the slot generation, so any
//! copy of the old handle (held by a point definition, or by the host) fails
//! the liveness check instead of reaching freed state. Point definitions hold
//! the registry weakly; dropping the registry makes every link stale.

use std::sync::{Arc, Weak};

use hashbrown::HashMap;
use parking_lot::Mutex;

use super::context::ProviderContext;

/// Recomputes a base value on demand (e.g. "current head position").
pub trait UpdatableProvider: Send {
    fn values(&mut self, context: &ProviderContext) -> Vec<f32>;
}

impl<F> UpdatableProvider for F
where
    F: FnMut(&ProviderContext) -> Vec<f32> + Send,
{
    fn values(&mut self, context: &ProviderContext) -> Vec<f32> {
        self(context)
    }
}

/// Generational handle to a registered provider.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UpdatableHandle {
    index: u32,
    generation: u32,
}

impl UpdatableHandle {
    /// Pack into a non-zero integer for the C boundary (`0` is the null handle).
    #[inline]
    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    #[inline]
    pub fn from_bits(bits: u64) -> Option<Self> {
        let generation = (bits >> 32) as u32;
        if generation == 0 {
            return None;
        }
        Some(Self {
            index: bits as u32,
            generation,
        })
    }
}

type SharedProvider = Arc<Mutex<Box<dyn UpdatableProvider>>>;

struct Slot {
    generation: u32,
    name: String,
    provider: Option<SharedProvider>,
}

#[derive(Default)]
struct SlotTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    // newest registration last
    by_name: HashMap<String, Vec<UpdatableHandle>>,
}

impl SlotTable {
    fn live(&self, handle: UpdatableHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.provider.is_some())
    }
}

#[derive(Default)]
pub(crate) struct RegistryInner {
    table: Mutex<SlotTable>,
}

impl RegistryInner {
    fn invoke(&self, handle: UpdatableHandle, context: &ProviderContext) -> Option<Vec<f32>> {
        // Clone the provider out so the table lock is not held during the callback.
        let provider = {
            let table = self.table.lock();
            table.live(handle)?.provider.clone()?
        };
        let mut guard = provider.lock();
        Some(guard.values(context))
    }
}

/// Registry of externally-owned callback providers.
#[derive(Default)]
pub struct UpdatableProviderRegistry {
    inner: Arc<RegistryInner>,
}

impl UpdatableProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `name`. A later registration under the same
    /// name shadows the earlier one for name lookups until it is disposed;
    /// both stay invocable.
    pub fn register(
        &self,
        name: &str,
        provider: impl UpdatableProvider + 'static,
    ) -> UpdatableHandle {
        let shared: SharedProvider = Arc::new(Mutex::new(Box::new(provider)));
        let mut table = self.inner.table.lock();
        let handle = match table.free.pop() {
            Some(index) => {
                let slot = &mut table.slots[index as usize];
                slot.name = name.to_string();
                slot.provider = Some(shared);
                UpdatableHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = table.slots.len() as u32;
                table.slots.push(Slot {
                    generation: 1,
                    name: name.to_string(),
                    provider: Some(shared),
                });
                UpdatableHandle {
                    index,
                    generation: 1,
                }
            }
        };
        table.by_name.entry_ref(name).or_default().push(handle);
        log::debug!("updatable provider '{name}' registered as {:#x}", handle.to_bits());
        handle
    }

    /// Release a provider. Returns `false` for stale or unknown handles.
    pub fn dispose(&self, handle: UpdatableHandle) -> bool {
        let released = {
            let mut table = self.inner.table.lock();
            if table.live(handle).is_none() {
                return false;
            }
            let slot = &mut table.slots[handle.index as usize];
            let provider = slot.provider.take();
            // generation 0 is reserved for the null handle
            slot.generation = slot.generation.wrapping_add(1).max(1);
            let name = std::mem::take(&mut slot.name);
            if let Some(stack) = table.by_name.get_mut(&name) {
                stack.retain(|h| *h != handle);
                if stack.is_empty() {
                    table.by_name.remove(&name);
                }
            }
            table.free.push(handle.index);
            provider
        };
        // drop outside the table lock
        drop(released);
        true
    }

    pub fn is_alive(&self, handle: UpdatableHandle) -> bool {
        self.inner.table.lock().live(handle).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<UpdatableHandle> {
        self.inner
            .table
            .lock()
            .by_name
            .get(name)
            .and_then(|stack| stack.last().copied())
    }

    /// Invoke a provider. `None` when the handle is stale.
    pub fn invoke(&self, handle: UpdatableHandle, context: &ProviderContext) -> Option<Vec<f32>> {
        self.inner.invoke(handle, context)
    }

    /// Number of live providers.
    pub fn len(&self) -> usize {
        let table = self.inner.table.lock();
        table.slots.len() - table.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn link(&self, handle: UpdatableHandle) -> UpdatableLink {
        UpdatableLink {
            registry: Arc::downgrade(&self.inner),
            handle,
        }
    }
}

impl std::fmt::Debug for UpdatableProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatableProviderRegistry")
            .field("live", &self.len())
            .finish()
    }
}

/// Non-owning reference from a point definition to a registered provider.
#[derive(Clone)]
pub(crate) struct UpdatableLink {
    registry: Weak<RegistryInner>,
    handle: UpdatableHandle,
}

impl UpdatableLink {
    pub(crate) fn invoke(&self, context: &ProviderContext) -> Option<Vec<f32>> {
        let registry = self.registry.upgrade()?;
        registry.invoke(self.handle, context)
    }

    pub(crate) fn handle(&self) -> UpdatableHandle {
        self.handle
    }
}

impl std::fmt::Debug for UpdatableLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatableLink")
            .field("handle", &self.handle)
            .field("registry_alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn handles_pack_to_non_zero_bits() {
        let registry = UpdatableProviderRegistry::new();
        let handle = registry.register("head", |_: &ProviderContext| vec![1.0]);
        let bits = handle.to_bits();
        assert_ne!(bits, 0);
        assert_eq!(UpdatableHandle::from_bits(bits), Some(handle));
        assert_eq!(UpdatableHandle::from_bits(0), None);
    }

    #[test]
    fn disposed_handle_is_never_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = UpdatableProviderRegistry::new();
        let ctx = ProviderContext::new();
        let handle = registry.register("head", move |_: &ProviderContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![1.0, 2.0, 3.0]
        });

        assert_eq!(registry.invoke(handle, &ctx), Some(vec![1.0, 2.0, 3.0]));
        assert!(registry.dispose(handle));
        assert!(!registry.dispose(handle));
        assert_eq!(registry.invoke(handle, &ctx), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.lookup("head").is_none());
    }

    #[test]
    fn reused_slot_rejects_old_generation() {
        let registry = UpdatableProviderRegistry::new();
        let ctx = ProviderContext::new();
        let old = registry.register("a", |_: &ProviderContext| vec![1.0]);
        registry.dispose(old);
        let new = registry.register("b", |_: &ProviderContext| vec![2.0]);
        assert_ne!(old, new);
        assert!(!registry.is_alive(old));
        assert_eq!(registry.invoke(old, &ctx), None);
        assert_eq!(registry.invoke(new, &ctx), Some(vec![2.0]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn disposing_shadowing_registration_restores_earlier_one() {
        let registry = UpdatableProviderRegistry::new();
        let ctx = ProviderContext::new();
        let first = registry.register("head", |_: &ProviderContext| vec![1.0]);
        let second = registry.register("head", |_: &ProviderContext| vec![2.0]);
        assert_eq!(registry.lookup("head"), Some(second));

        assert!(registry.dispose(second));
        assert!(registry.is_alive(first));
        assert_eq!(registry.lookup("head"), Some(first));
        assert_eq!(registry.invoke(first, &ctx), Some(vec![1.0]));

        // disposing the older one while shadowed keeps the newer lookup
        let third = registry.register("head", |_: &ProviderContext| vec![3.0]);
        assert!(registry.dispose(first));
        assert_eq!(registry.lookup("head"), Some(third));
        assert!(registry.dispose(third));
        assert_eq!(registry.lookup("head"), None);
    }

    #[test]
    fn link_goes_stale_when_registry_drops() {
        let ctx = ProviderContext::new();
        let registry = UpdatableProviderRegistry::new();
        let handle = registry.register("a", |_: &ProviderContext| vec![4.0]);
        let link = registry.link(handle);
        assert_eq!(link.invoke(&ctx), Some(vec![4.0]));
        drop(registry);
        assert_eq!(link.invoke(&ctx), None);
    }
}
