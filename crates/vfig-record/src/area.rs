//! Per-slot application data registered on a figure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One data slot owned by an application.
///
/// Both ids are opaque; field names on disk are `program_id` and
/// `access_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaEntry {
    #[serde(rename = "program_id")]
    pub owner_id: u64,
    #[serde(rename = "access_id")]
    pub slot_id: u32,
}

impl AreaEntry {
    pub fn new(owner_id: u64, slot_id: u32) -> Self {
        Self { owner_id, slot_id }
    }
}

impl fmt::Display for AreaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game 0x{:016X} (0x{:08X})", self.owner_id, self.slot_id)
    }
}

/// Ordered slot list plus the currently active slot.
///
/// Entries keep their persisted order. `active_slot_id` is not required to
/// match any entry; callers only use it to mark the active line for display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaTable {
    #[serde(rename = "current_area_access_id")]
    pub active_slot_id: u32,
    #[serde(rename = "areas")]
    pub entries: Vec<AreaEntry>,
}

impl AreaTable {
    pub fn new(active_slot_id: u32, entries: Vec<AreaEntry>) -> Self {
        Self {
            active_slot_id,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `entry` is the active slot.
    pub fn is_active(&self, entry: &AreaEntry) -> bool {
        entry.slot_id == self.active_slot_id
    }

    /// The entry whose slot is active, if any.
    pub fn active_entry(&self) -> Option<&AreaEntry> {
        self.entries.iter().find(|e| self.is_active(e))
    }

    /// One display line per entry, in persisted order.
    pub fn describe(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                if self.is_active(entry) {
                    format!("[Active area] {entry}")
                } else {
                    entry.to_string()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AreaTable {
        AreaTable::new(
            0x1234_5678,
            vec![
                AreaEntry::new(0x0100_5510_0010_2000, 0x0000_0001),
                AreaEntry::new(0x0100_6A80_0016_E000, 0x1234_5678),
            ],
        )
    }

    #[test]
    fn entry_display() {
        let entry = AreaEntry::new(0x01006A800016E000, 0x34F80200);
        assert_eq!(entry.to_string(), "Game 0x01006A800016E000 (0x34F80200)");
    }

    #[test]
    fn describe_marks_active_slot() {
        let lines = table().describe();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].starts_with("[Active area]"));
        assert_eq!(lines[1], "[Active area] Game 0x01006A800016E000 (0x12345678)");
    }

    #[test]
    fn active_slot_is_not_enforced() {
        let mut t = table();
        t.active_slot_id = 0xDEAD_BEEF;
        assert!(t.active_entry().is_none());
        assert!(t.describe().iter().all(|l| !l.starts_with("[Active area]")));
    }

    #[test]
    fn serde_uses_disk_keys_and_keeps_order() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["current_area_access_id"], 0x1234_5678u32);
        assert_eq!(json["areas"][0]["program_id"], 0x0100_5510_0010_2000u64);
        assert_eq!(json["areas"][1]["access_id"], 0x1234_5678u32);
        let back: AreaTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table());
    }

    #[test]
    fn large_owner_ids_survive() {
        let t = AreaTable::new(1, vec![AreaEntry::new(u64::MAX, 1)]);
        let raw = serde_json::to_string(&t).unwrap();
        let back: AreaTable = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.entries[0].owner_id, u64::MAX);
    }
}
