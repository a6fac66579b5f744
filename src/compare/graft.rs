use std::collections::HashMap;

use tracing::{debug, warn};

use crate::compare::context::Role;
use crate::compare::report::MergeSummary;
use crate::core::event::{EventKind, NOTE_TAG, SOURCE_TAG};
use crate::core::family::{add_child, new_family, set_husband, set_wife};
use crate::core::individual::{add_spouse_family, set_parent_family, strip_family_links};
use crate::core::record::Record;
use crate::core::types::{RecordKind, Sex};
use crate::store::Gedcom;

/// Source-tree id -> destination-tree id of records known to be the same.
///
/// The first mapping recorded for an id wins.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    map: HashMap<String, String>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.map.get(source).map(String::as_str)
    }

    /// Record a mapping unless `source` is already mapped
    pub fn insert(&mut self, source: &str, dest: &str) {
        self.map
            .entry(source.to_string())
            .or_insert_with(|| dest.to_string());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Copies records from a source tree into a destination tree and links them in
pub struct Grafter<'g> {
    source: &'g Gedcom,
    dest: &'g mut Gedcom,
    ids: &'g mut IdMap,
    summary: &'g mut MergeSummary,
}

impl<'g> Grafter<'g> {
    pub fn new(
        source: &'g Gedcom,
        dest: &'g mut Gedcom,
        ids: &'g mut IdMap,
        summary: &'g mut MergeSummary,
    ) -> Self {
        Self {
            source,
            dest,
            ids,
            summary,
        }
    }

    /// Destination id for a source individual: the known counterpart if there
    /// is one, otherwise a fresh copy without family links.
    pub fn individual(&mut self, source_id: &str) -> Option<String> {
        let known = self
            .ids
            .get(source_id)
            .filter(|id| self.dest.individual(id).is_some())
            .map(str::to_string);
        if known.is_some() {
            return known;
        }

        let source = self.source;
        let mut clone = source.individual(source_id)?.record().clone();
        let id = self.dest.mint_id(RecordKind::Individual);
        clone.xref = Some(id.clone());
        strip_family_links(&mut clone);
        self.ids.insert(source_id, &id);
        self.remap_references(&mut clone);
        self.dest.insert(clone);
        self.summary.individuals += 1;
        debug!(source = source_id, dest = %id, "Grafted individual");
        Some(id)
    }

    /// Copy an event under `owner`, replacing any existing event of a singular kind
    pub fn event(&mut self, event: &Record, owner: &str) -> bool {
        if !self.dest.contains(owner) {
            return false;
        }
        let mut clone = event.clone();
        self.remap_references(&mut clone);

        let Some(record) = self.dest.get_mut(owner) else {
            return false;
        };
        if EventKind::from_tag(&clone.tag).is_some_and(EventKind::is_singular) {
            record.remove_children(&clone.tag);
        }
        debug!(owner, tag = %clone.tag, "Grafted event");
        record.push_child(clone);
        self.summary.events += 1;
        true
    }

    /// Destination family for a source spouse family, with `focal_dest` placed
    /// in the slot `focal_source` holds in the source family.
    ///
    /// Only the family's own notes and sources are copied; spouses, children
    /// and the marriage are left to the caller.
    pub fn family(
        &mut self,
        source_id: &str,
        focal_source: &str,
        focal_dest: &str,
    ) -> Option<String> {
        let source = self.source;
        let family = source.family(source_id)?;
        let slot = if family.husband() == Some(focal_source) {
            Role::Husband
        } else if family.wife() == Some(focal_source) {
            Role::Wife
        } else {
            self.slot_by_sex(focal_dest)
        };

        let known = self
            .ids
            .get(source_id)
            .filter(|id| self.dest.family(id).is_some())
            .map(str::to_string);
        let id = match known {
            Some(id) => id,
            None => {
                let id = self.dest.mint_id(RecordKind::Family);
                let mut record = new_family(&id);
                for child in &family.record().children {
                    if child.tag == NOTE_TAG || child.tag == SOURCE_TAG {
                        record.push_child(child.clone());
                    }
                }
                self.ids.insert(source_id, &id);
                self.remap_references(&mut record);
                self.dest.insert(record);
                self.summary.families += 1;
                debug!(source = source_id, dest = %id, "Grafted family");
                id
            }
        };

        self.place_spouse(&id, focal_dest, slot);
        Some(id)
    }

    /// Link `parent` as a parent of `child` in the slot `role` names.
    ///
    /// The family used is the child's parent family, else the counterpart of
    /// `source_family`, else a new family. A father takes the husband slot and
    /// a mother the wife slot, whatever sex is recorded.
    pub fn link_parent(
        &mut self,
        child: &str,
        parent: &str,
        source_family: Option<&str>,
        role: Role,
    ) -> bool {
        let family = self
            .parent_family(child, source_family)
            .unwrap_or_else(|| self.synthesize_family());

        if let Some(record) = self.dest.get_mut(child) {
            set_parent_family(record, &family);
        }
        if let Some(record) = self.dest.get_mut(&family) {
            add_child(record, child);
        }
        if let Some(source_family) = source_family {
            self.ids.insert(source_family, &family);
        }

        self.place_spouse(&family, parent, parent_slot(role))
    }

    /// Whether [`Self::link_parent`] would place the copy of `source_parent`
    pub fn can_link_parent(
        &self,
        child: &str,
        source_parent: &str,
        source_family: Option<&str>,
        role: Role,
    ) -> bool {
        match self.parent_family(child, source_family) {
            Some(family) => self.slot_open(&family, source_parent, parent_slot(role)),
            None => true,
        }
    }

    /// Link `spouse` into the existing `family` in the slot given by `role`
    pub fn link_spouse(&mut self, family: &str, spouse: &str, role: Role) -> bool {
        self.place_spouse(family, spouse, role)
    }

    /// Whether [`Self::link_spouse`] would place the copy of `source_spouse`
    pub fn can_link_spouse(&self, family: &str, source_spouse: &str, role: Role) -> bool {
        self.slot_open(family, source_spouse, role)
    }

    /// Add `child` to the existing `family`.
    /// The child's parent family is only set if it has none.
    pub fn link_child(&mut self, family: &str, child: &str) -> bool {
        let Some(record) = self.dest.get_mut(family) else {
            return false;
        };
        add_child(record, child);
        if let Some(record) = self.dest.get_mut(child) {
            set_parent_family(record, family);
        }
        true
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.dest.family(family).is_some()
    }

    /// The child's parent family, else the counterpart of `source_family`
    fn parent_family(&self, child: &str, source_family: Option<&str>) -> Option<String> {
        self.dest
            .individual(child)
            .and_then(|c| c.parent_family())
            .filter(|f| self.dest.family(f).is_some())
            .or_else(|| {
                source_family
                    .and_then(|f| self.ids.get(f))
                    .filter(|f| self.dest.family(f).is_some())
            })
            .map(str::to_string)
    }

    /// Free for the counterpart of `source_person`: empty or already theirs,
    /// with the other slot not theirs
    fn slot_open(&self, family: &str, source_person: &str, slot: Role) -> bool {
        let Some(view) = self.dest.family(family) else {
            return false;
        };
        let counterpart = self.ids.get(source_person);
        let (held, other) = match slot {
            Role::Wife => (view.wife(), view.husband()),
            _ => (view.husband(), view.wife()),
        };
        held.map_or(true, |h| Some(h) == counterpart)
            && counterpart.map_or(true, |c| other != Some(c))
    }

    /// Put `person` in a spouse slot unless someone else holds it or they
    /// already hold the other one
    fn place_spouse(&mut self, family: &str, person: &str, slot: Role) -> bool {
        let Some(view) = self.dest.family(family) else {
            return false;
        };
        let (occupant, other) = match slot {
            Role::Wife => (view.wife(), view.husband()),
            _ => (view.husband(), view.wife()),
        };
        let occupant = occupant.map(str::to_string);

        if other == Some(person) {
            warn!(
                family,
                slot = %slot,
                person,
                "Already holds the other spouse slot, not linking"
            );
            return false;
        }
        if let Some(occupant) = occupant.filter(|o| o != person) {
            warn!(
                family,
                slot = %slot,
                occupant = %occupant,
                person,
                "Spouse slot already occupied, not linking"
            );
            return false;
        }

        if let Some(record) = self.dest.get_mut(family) {
            match slot {
                Role::Wife => set_wife(record, person),
                _ => set_husband(record, person),
            }
        }
        if let Some(record) = self.dest.get_mut(person) {
            add_spouse_family(record, family);
        }
        true
    }

    fn slot_by_sex(&self, person: &str) -> Role {
        match self.dest.individual(person).and_then(|i| i.sex()) {
            Some(Sex::Female) => Role::Wife,
            _ => Role::Husband,
        }
    }

    fn synthesize_family(&mut self) -> String {
        let id = self.dest.mint_id(RecordKind::Family);
        self.dest.insert(new_family(&id));
        self.summary.families += 1;
        debug!(dest = %id, "Created family");
        id
    }

    /// Point every NOTE/SOUR reference in `record` at a destination copy
    fn remap_references(&mut self, record: &mut Record) {
        record.rewrite_pointers(&[NOTE_TAG, SOURCE_TAG], &mut |_, pointer| {
            self.auxiliary(pointer)
        });
    }

    /// Destination copy of a source note or source, made once per source id.
    /// Dangling references yield `None`, which drops the referencing line.
    fn auxiliary(&mut self, source_id: &str) -> Option<String> {
        if let Some(id) = self.ids.get(source_id) {
            return Some(id.to_string());
        }

        let source = self.source;
        let record = source.get(source_id)?;
        let kind = RecordKind::of(record);
        if !matches!(kind, RecordKind::Note | RecordKind::Source) {
            return None;
        }

        let mut clone = record.clone();
        let id = self.dest.mint_id(kind);
        clone.xref = Some(id.clone());
        self.ids.insert(source_id, &id);
        self.remap_references(&mut clone);
        self.dest.insert(clone);
        match kind {
            RecordKind::Note => self.summary.notes += 1,
            _ => self.summary.sources += 1,
        }
        debug!(source = source_id, dest = %id, kind = %kind, "Grafted record");
        Some(id)
    }
}

/// Spouse slot of a parent family a parent takes
fn parent_slot(role: Role) -> Role {
    match role {
        Role::Mother => Role::Wife,
        _ => Role::Husband,
    }
}
