//! Static base providers, set by the host and read live by point definitions.

use hashbrown::HashMap;

/// One named base value.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseEntry {
    pub name: String,
    pub values: Vec<f32>,
    pub is_quaternion: bool,
}

/// Cached position of a named entry inside a [`ProviderContext`].
///
/// Entries are never removed, so a slot stays valid for the lifetime of the
/// context it came from. Reads verify the slot's name and fall back to a
/// by-name lookup when handed a context the slot does not belong to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProviderSlot(pub(crate) u32);

impl ProviderSlot {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Mapping of provider names to base values.
#[derive(Debug, Default)]
pub struct ProviderContext {
    entries: Vec<BaseEntry>,
    index: HashMap<String, ProviderSlot>,
}

impl ProviderContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a named base value. Replacing keeps the slot, so
    /// definitions that cached it observe the new values on their next query.
    pub fn set(&mut self, name: &str, values: Vec<f32>, is_quaternion: bool) -> ProviderSlot {
        if let Some(&slot) = self.index.get(name) {
            let entry = &mut self.entries[slot.index()];
            entry.values = values;
            entry.is_quaternion = is_quaternion;
            return slot;
        }
        let slot = ProviderSlot(self.entries.len() as u32);
        self.entries.push(BaseEntry {
            name: name.to_string(),
            values,
            is_quaternion,
        });
        self.index.insert(name.to_string(), slot);
        log::debug!("base provider '{name}' registered at slot {}", slot.0);
        slot
    }

    pub fn slot(&self, name: &str) -> Option<ProviderSlot> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&BaseEntry> {
        self.slot(name).map(|slot| &self.entries[slot.index()])
    }

    /// Read through a cached slot; `name` guards against slots from another context.
    pub fn get_slot(&self, slot: ProviderSlot, name: &str) -> Option<&BaseEntry> {
        match self.entries.get(slot.index()) {
            Some(entry) if entry.name == name => Some(entry),
            _ => self.get(name),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut ctx = ProviderContext::new();
        let a = ctx.set("head", vec![1.0, 2.0, 3.0], false);
        let b = ctx.set("head", vec![0.0, 0.0, 0.0, 1.0], true);
        assert_eq!(a, b);
        assert_eq!(ctx.len(), 1);
        let entry = ctx.get("head").unwrap();
        assert_eq!(entry.values, vec![0.0, 0.0, 0.0, 1.0]);
        assert!(entry.is_quaternion);
    }

    #[test]
    fn foreign_slot_falls_back_to_name() {
        let mut first = ProviderContext::new();
        first.set("a", vec![1.0], false);
        let slot_b = first.set("b", vec![2.0], false);

        let mut second = ProviderContext::new();
        second.set("b", vec![20.0], false);

        // slot_b points at index 1 which does not exist in `second`
        assert_eq!(second.get_slot(slot_b, "b").unwrap().values, vec![20.0]);
        assert!(second.get_slot(slot_b, "missing").is_none());
    }
}
