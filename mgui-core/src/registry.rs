//! Widget registry
//!
//! One record list per widget kind, plus two indexes:
//! - handle → record, used to recover identity when the toolkit reports input
//! - name → records, used by programmatic access
//!
//! Name resolution takes a list of kinds and returns the first record of the
//! first kind in that list that has one with the name. Within a kind the
//! earliest registered record wins.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use mgui_display::WidgetHandle;

use crate::record::{WidgetKind, WidgetRecord};

/// Position of a record in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    pub kind: WidgetKind,
    pub index: usize,
}

/// What a toolkit handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandleRef {
    /// The widget of a record
    Widget(Slot),
    /// One option of a radio group; `group` indexes the radiobutton list
    RadioOption { group: usize, option: usize },
}

/// Options of one radio group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioGroup {
    /// Option widgets in display order
    pub options: Vec<WidgetHandle>,
    /// Index of the checked option
    pub active: usize,
}

impl RadioGroup {
    pub fn new(options: Vec<WidgetHandle>) -> Self {
        Self { options, active: 0 }
    }

    pub fn option(&self, index: usize) -> Option<WidgetHandle> {
        self.options.get(index).copied()
    }
}

/// Records of every rendered widget
#[derive(Debug, Clone, Default)]
pub struct Registry {
    lists: [Vec<WidgetRecord>; WidgetKind::COUNT],
    /// Parallel to the radiobutton list
    groups: Vec<RadioGroup>,
    by_handle: BTreeMap<WidgetHandle, HandleRef>,
    by_name: BTreeMap<String, Vec<Slot>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget
    pub fn insert(&mut self, record: WidgetRecord) -> Slot {
        let slot = Slot {
            kind: record.kind,
            index: self.lists[record.kind.index()].len(),
        };
        self.by_handle.insert(record.handle, HandleRef::Widget(slot));
        self.by_name
            .entry(record.name.clone())
            .or_default()
            .push(slot);
        self.lists[record.kind.index()].push(record);
        slot
    }

    /// Register a radio group; `record.handle` is the group container
    pub fn insert_radio(&mut self, record: WidgetRecord, group: RadioGroup) -> Slot {
        let group_index = self.groups.len();
        for (option, handle) in group.options.iter().enumerate() {
            self.by_handle.insert(
                *handle,
                HandleRef::RadioOption {
                    group: group_index,
                    option,
                },
            );
        }
        self.groups.push(group);
        self.insert(WidgetRecord {
            kind: WidgetKind::Radiobutton,
            ..record
        })
    }

    pub fn record(&self, slot: Slot) -> Option<&WidgetRecord> {
        self.lists[slot.kind.index()].get(slot.index)
    }

    /// Records of one kind in registration order
    pub fn records(&self, kind: WidgetKind) -> &[WidgetRecord] {
        &self.lists[kind.index()]
    }

    /// Number of records of one kind
    pub fn count(&self, kind: WidgetKind) -> usize {
        self.lists[kind.index()].len()
    }

    /// Number of records of every kind
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What a toolkit handle belongs to
    pub fn resolve(&self, handle: WidgetHandle) -> Option<HandleRef> {
        self.by_handle.get(&handle).copied()
    }

    /// Resolve a name against `kinds` in order
    pub fn find(&self, name: &str, kinds: &[WidgetKind]) -> Option<Slot> {
        let slots = self.by_name.get(name)?;
        kinds
            .iter()
            .find_map(|kind| slots.iter().find(|slot| slot.kind == *kind).copied())
    }

    pub fn group(&self, index: usize) -> Option<&RadioGroup> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut RadioGroup> {
        self.groups.get_mut(index)
    }

    /// Drop every record and index entry, returning how many records there were
    pub fn release(&mut self) -> usize {
        let released = self.len();
        for list in &mut self.lists {
            list.clear();
        }
        self.groups.clear();
        self.by_handle.clear();
        self.by_name.clear();
        released
    }
}
