use std::collections::HashMap;

use shared::domain::{Employee, EmployeeId};

use crate::pagination::CHUNK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Succeeded,
    Failed,
}

/// A single editable field of the draft record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Name,
    JobTitle,
    Department,
    Company,
}

/// The in-progress edit, if any: which record is selected, the mutable copy
/// of its fields, and where the save lifecycle currently stands.
///
/// `draft` exists exactly while `selected` is set.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub selected: Option<EmployeeId>,
    pub draft: Option<Employee>,
    pub save_status: SaveStatus,
    pub banner_visible: bool,
}

impl EditSession {
    /// Seeds the session from a record, replacing any prior selection.
    pub fn select(&mut self, record: &Employee) {
        self.selected = Some(record.id);
        self.draft = Some(record.clone());
        self.save_status = SaveStatus::Idle;
        self.banner_visible = false;
    }

    /// Updates one draft field. Returns false when nothing is selected.
    /// The selected identity is never touched here.
    pub fn edit_field(&mut self, field: EmployeeField, value: String) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        match field {
            EmployeeField::Name => draft.name = value,
            EmployeeField::JobTitle => draft.job_title = value,
            EmployeeField::Department => draft.department = value,
            EmployeeField::Company => draft.company = value,
        }
        true
    }

    /// Moves the session into Saving and hands back the draft to dispatch.
    /// Returns None when no record is selected, in which case the session is
    /// left untouched.
    pub fn begin_save(&mut self) -> Option<Employee> {
        let draft = self.draft.as_ref()?.clone();
        self.save_status = SaveStatus::Saving;
        self.banner_visible = false;
        Some(draft)
    }

    pub fn finish_save_success(&mut self) {
        self.save_status = SaveStatus::Succeeded;
        self.banner_visible = true;
    }

    pub fn finish_save_failure(&mut self) {
        self.save_status = SaveStatus::Failed;
        self.banner_visible = false;
    }

    /// Hides the success banner without leaving the succeeded state, so the
    /// session stays editable afterwards.
    pub fn dismiss_banner(&mut self) {
        self.banner_visible = false;
    }

    pub fn cancel(&mut self) {
        self.selected = None;
        self.draft = None;
        self.save_status = SaveStatus::Idle;
        self.banner_visible = false;
    }
}

/// The owned state container behind the directory client: the full fetched
/// dataset, the visible prefix window, load/error status, the edit session,
/// and per-record save generations used to drop stale save responses.
///
/// All transitions here are synchronous and side-effect free; the async
/// orchestration lives in [`crate::DirectoryClient`].
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    pub all_data: Vec<Employee>,
    pub visible: Vec<Employee>,
    pub load_phase: LoadPhase,
    pub last_error: Option<String>,
    pub fetched: bool,
    pub edit: EditSession,
    save_generations: HashMap<EmployeeId, u64>,
}

impl DirectoryState {
    pub fn begin_fetch(&mut self) {
        self.load_phase = LoadPhase::Loading;
        self.last_error = None;
    }

    /// Installs the fetched dataset and reveals the first chunk (or the whole
    /// set when it is smaller than one chunk).
    pub fn complete_fetch(&mut self, records: Vec<Employee>) {
        self.visible = records.iter().take(CHUNK_SIZE).cloned().collect();
        self.all_data = records;
        self.load_phase = LoadPhase::Idle;
    }

    /// Records a failed fetch. Previously fetched data, if any, is left as is.
    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.load_phase = LoadPhase::Error;
        self.last_error = Some(message.into());
    }

    /// Appends records to the visible window, preserving order. No-op on
    /// empty input. Returns how many records were appended.
    pub fn append_visible(&mut self, new_items: &[Employee]) -> usize {
        if new_items.is_empty() {
            return 0;
        }
        self.visible.extend_from_slice(new_items);
        new_items.len()
    }

    /// Replaces the record with a matching id in both the full dataset and
    /// the visible window. A missing id in either collection is a silent
    /// no-op, which also makes repeated application idempotent.
    pub fn apply_local_update(&mut self, record: &Employee) {
        if let Some(slot) = self.all_data.iter_mut().find(|r| r.id == record.id) {
            *slot = record.clone();
        }
        if let Some(slot) = self.visible.iter_mut().find(|r| r.id == record.id) {
            *slot = record.clone();
        }
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Stamps a new save attempt for this record and returns its generation.
    pub fn bump_save_generation(&mut self, id: EmployeeId) -> u64 {
        let generation = self.save_generations.entry(id).or_insert(0);
        *generation += 1;
        *generation
    }

    /// True when no newer save for this record has been dispatched since the
    /// given generation was stamped.
    pub fn is_latest_save_generation(&self, id: EmployeeId, generation: u64) -> bool {
        self.save_generations.get(&id).copied() == Some(generation)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
