//! Per-procedure symbol tables.
//!
//! Each procedure gets a flat table mapping local names to a slot index and
//! a resolved static type. Parameters occupy the first slots; declarations
//! follow in first-seen order. Redeclaring a name reuses its slot.

use metsu_types::ValueType;
use std::collections::HashMap;

/// A resolved local: its slot index and static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSlot {
    pub index: u32,
    pub ty: ValueType,
}

/// Name-to-slot table for one procedure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    /// Slots in index order. Parameters first, then declarations.
    slots: Vec<(String, ValueType)>,
    index: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, or update its type if it is already present.
    /// Returns the slot the name resolves to.
    pub fn declare(&mut self, name: &str, ty: ValueType) -> LocalSlot {
        if let Some(&index) = self.index.get(name) {
            self.slots[index as usize].1 = ty;
            return LocalSlot { index, ty };
        }
        let index = self.slots.len() as u32;
        self.slots.push((name.to_string(), ty));
        self.index.insert(name.to_string(), index);
        LocalSlot { index, ty }
    }

    /// Look up a name.
    pub fn resolve(&self, name: &str) -> Option<LocalSlot> {
        self.index.get(name).map(|&index| LocalSlot {
            index,
            ty: self.slots[index as usize].1,
        })
    }

    /// Number of slots, parameters included.
    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot types in index order.
    pub fn slot_types(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.slots.iter().map(|(_, ty)| *ty)
    }
}
