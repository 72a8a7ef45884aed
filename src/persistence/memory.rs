//! In-memory reference implementation of the persistence collaborator.
//!
//! A [`MemoryStore`] plays the part of a model class: it owns the machine
//! and the validation rules shared by every record, and a table of
//! bincode-encoded rows. A [`Record`] is one loaded instance.
//!
//! Saves are optimistic: each row carries a version, and a record may only
//! overwrite the version it was loaded at. A stale write is refused like
//! any other validation failure.

use crate::builder::DEFAULT_ATTRIBUTE;
use crate::core::{Event, State, StateHistory, StateTransition};
use crate::enablement::Stateable;
use crate::machine::StateMachine;
use crate::persistence::error::StoreError;
use crate::persistence::tracked::Tracked;
use crate::persistence::{Persistence, ValidationErrors};
use crate::validation::{ValidationContext, ValidationRules};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::{debug, warn};
use uuid::Uuid;

/// Machine type for records of a [`MemoryStore`].
pub type RecordMachine<T, S, E> = StateMachine<S, E, Record<T, S, E>>;

#[derive(Serialize)]
struct RowRef<'a, T, S> {
    data: &'a T,
    state: Option<&'a S>,
}

#[derive(Deserialize)]
struct Row<T, S> {
    data: T,
    state: Option<S>,
}

struct StoredRow {
    version: u64,
    bytes: Vec<u8>,
}

/// Shared, thread-safe table of records for one model.
pub struct MemoryStore<T, S: State, E: Event> {
    model: Arc<str>,
    machine: Option<Arc<RecordMachine<T, S, E>>>,
    validations: Arc<ValidationRules<T, S>>,
    rows: Arc<RwLock<HashMap<Uuid, StoredRow>>>,
}

impl<T, S: State, E: Event> Clone for MemoryStore<T, S, E> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            machine: self.machine.clone(),
            validations: Arc::clone(&self.validations),
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T, S, E> MemoryStore<T, S, E>
where
    T: Serialize + DeserializeOwned,
    S: State,
    E: Event,
{
    /// A store for `model` with no machine and no validations.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Arc::from(model.into()),
            machine: None,
            validations: Arc::new(ValidationRules::none()),
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Attach the state machine every record of this store uses.
    pub fn with_machine(mut self, machine: RecordMachine<T, S, E>) -> Self {
        self.machine = Some(Arc::new(machine));
        self
    }

    pub fn with_validations(mut self, rules: ValidationRules<T, S>) -> Self {
        self.validations = Arc::new(rules);
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn machine(&self) -> Option<&Arc<RecordMachine<T, S, E>>> {
        self.machine.as_ref()
    }

    /// Attribute the state is stored under.
    pub fn attribute(&self) -> &str {
        self.machine
            .as_ref()
            .map_or(DEFAULT_ATTRIBUTE, |machine| machine.attribute())
    }

    /// A new, unsaved record. Its state attribute starts unassigned.
    pub fn create(&self, data: T) -> Record<T, S, E> {
        Record {
            id: Uuid::new_v4(),
            data,
            state: Tracked::unset(),
            version: 0,
            history: StateHistory::new(),
            store: self.clone(),
        }
    }

    /// Load the stored version of record `id`.
    pub fn load(&self, id: Uuid) -> Result<Record<T, S, E>, StoreError> {
        let (version, row) = self.read(id)?;
        debug!(model = %self.model, %id, version, "record loaded");

        Ok(Record {
            id,
            data: row.data,
            state: Tracked::persisted(row.state),
            version,
            history: StateHistory::new(),
            store: self.clone(),
        })
    }

    /// The state value currently in storage for `id`.
    pub fn stored_state(&self, id: Uuid) -> Result<Option<S>, StoreError> {
        self.read(id).map(|(_, row)| row.state)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn read(&self, id: Uuid) -> Result<(u64, Row<T, S>), StoreError> {
        let rows = self.rows.read();
        let stored = rows.get(&id).ok_or(StoreError::NotFound(id))?;
        let row = bincode::deserialize(&stored.bytes)
            .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
        Ok((stored.version, row))
    }

    /// Write a row if the stored version is still `expected`, returning the
    /// new version.
    fn write(&self, id: Uuid, expected: u64, row: &RowRef<'_, T, S>) -> Result<u64, StoreError> {
        let bytes =
            bincode::serialize(row).map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        let mut rows = self.rows.write();
        let found = rows.get(&id).map_or(0, |stored| stored.version);
        if found != expected {
            return Err(StoreError::Stale {
                id,
                expected,
                found,
            });
        }

        let version = expected + 1;
        rows.insert(id, StoredRow { version, bytes });
        Ok(version)
    }
}

/// One instance of a model, loaded from (or destined for) a
/// [`MemoryStore`].
pub struct Record<T, S: State, E: Event> {
    id: Uuid,
    data: T,
    state: Tracked<S>,
    version: u64,
    history: StateHistory<S>,
    store: MemoryStore<T, S, E>,
}

impl<T, S, E> Record<T, S, E>
where
    T: Serialize + DeserializeOwned,
    S: State,
    E: Event,
{
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutable access to the data. Changes are persisted by the next save.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Stored version this record was loaded at (0 for a new record).
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_new_record(&self) -> bool {
        self.version == 0
    }

    /// Whether the state attribute has an unsaved assignment.
    pub fn state_changed(&self) -> bool {
        self.state.is_dirty()
    }

    /// Transitions recorded on this instance since it was loaded.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Append to the in-memory history. Meant to be wired as a commit hook.
    pub fn record_transition(&mut self, transition: &StateTransition<S>) {
        self.history.push(transition.clone());
    }

    pub fn store(&self) -> &MemoryStore<T, S, E> {
        &self.store
    }

    /// Replace data and state with what is currently stored.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let (version, row) = self.store.read(self.id)?;
        self.data = row.data;
        self.state = Tracked::persisted(row.state);
        self.version = version;
        Ok(())
    }
}

impl<T, S: State, E: Event> Deref for Record<T, S, E> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T, S, E> Persistence<S> for Record<T, S, E>
where
    T: Serialize + DeserializeOwned,
    S: State,
    E: Event,
{
    fn current_value(&self, attribute: &str) -> Option<S> {
        if attribute == self.store.attribute() {
            self.state.get().cloned()
        } else {
            None
        }
    }

    fn assign(&mut self, attribute: &str, state: S) {
        if attribute == self.store.attribute() {
            self.state.assign(state);
        } else {
            warn!(model = %self.store.model, attribute, "assignment to unknown attribute ignored");
        }
    }

    fn save(&mut self) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(&self.data, self.state.get());
        if let Validation::Failure(errors) = self.store.validations.validate(&context) {
            return Err(errors.into());
        }

        let row = RowRef {
            data: &self.data,
            state: self.state.get(),
        };
        let version = self
            .store
            .write(self.id, self.version, &row)
            .map_err(|err| ValidationErrors::single(err.to_string()))?;

        self.version = version;
        self.state.commit();
        debug!(model = %self.store.model, id = %self.id, version, "record saved");
        Ok(())
    }

    fn rollback(&mut self, attribute: &str) {
        if attribute == self.store.attribute() {
            self.state.rollback();
        }
    }
}

impl<T, S, E> Stateable for Record<T, S, E>
where
    T: Serialize + DeserializeOwned,
    S: State,
    E: Event,
{
    type State = S;
    type Event = E;

    fn state_machine(&self) -> Option<Arc<RecordMachine<T, S, E>>> {
        self.store.machine.clone()
    }

    fn model_name(&self) -> &str {
        &self.store.model
    }
}
