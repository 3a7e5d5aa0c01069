//! The document store.
//!
//! A [`Store`] owns the current snapshot of one document. Every edit builds
//! the next snapshot on a draft and swaps it in only if the whole edit
//! succeeded, so readers holding an older `Arc` keep a consistent view and a
//! rejected edit leaves nothing behind. Writes take `&mut self`; the borrow
//! checker is the single-writer lock.

use crate::access::{get_at, Selector};
use crate::command::{apply_command, apply_commands, Command};
use crate::config::StoreConfig;
use crate::error::{StateError, StateResult};
use crate::lens::{Field, Lens, ListLens, Readable};
use crate::node::State;
use crate::required::missing_required;
use crate::selection::Selection;
use crate::Path;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A committed edit.
#[derive(Debug, Clone)]
pub struct Revision<R> {
    /// Sequence number; the template is revision 0.
    pub number: u64,
    /// Name of the command that produced it.
    pub label: &'static str,
    /// Path the command targeted, if any.
    pub path: Option<Path>,
    /// The document after the edit.
    pub snapshot: Arc<R>,
}

type Watch<R> = Box<dyn FnMut(&R) -> bool + Send>;

struct Subscriber<R> {
    id: SubscriptionId,
    watch: Watch<R>,
}

/// Single-writer owner of a document.
///
/// ```
/// use reqform_state::{Store, List};
/// use serde_json::json;
///
/// let mut store = Store::new(List::from(vec!["first".to_string()]));
/// assert!(store.set_value("3", json!("missing")).is_err());
/// store.set_value("0", json!("renamed")).unwrap();
///
/// assert_eq!(store.get("0").unwrap(), json!("renamed"));
/// assert_eq!(store.revision(), 1);
/// ```
pub struct Store<R: State> {
    config: StoreConfig,
    template: Arc<R>,
    current: Arc<R>,
    revision: u64,
    history: VecDeque<Revision<R>>,
    subscribers: Vec<Subscriber<R>>,
    next_subscription: u64,
}

impl<R: State> Store<R> {
    /// Create a store whose template and current document are `template`.
    pub fn new(template: R) -> Self {
        Self::with_config(template, StoreConfig::default())
    }

    /// Create a store with explicit options.
    pub fn with_config(template: R, config: StoreConfig) -> Self {
        let template = Arc::new(template);
        Self {
            config,
            current: Arc::clone(&template),
            template,
            revision: 0,
            history: VecDeque::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The current snapshot.
    #[inline]
    pub fn document(&self) -> Arc<R> {
        Arc::clone(&self.current)
    }

    /// The snapshot `reset` restores.
    #[inline]
    pub fn template(&self) -> Arc<R> {
        Arc::clone(&self.template)
    }

    /// Number of committed edits.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Options this store was built with.
    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read the value at a path as JSON. Derived fields are computed.
    pub fn get<S: Selector + ?Sized>(&self, selector: &S) -> StateResult<Value> {
        get_at(&*self.current, &selector.to_path()?)
    }

    /// Read through a typed lens.
    pub fn read<L: Readable>(&self, lens: &L) -> StateResult<L::Value> {
        lens.get(&*self.current)
    }

    /// Required fields that are still blank.
    pub fn missing_required(&self) -> Vec<Path> {
        missing_required(&*self.current)
    }

    /// Write a typed value.
    pub fn set<V: State>(&mut self, field: &Field<V>, value: V) -> StateResult<()> {
        let mut draft = Arc::clone(&self.current);
        let target: &mut R = Arc::make_mut(&mut draft);
        field
            .set(target, value)
            .map_err(|err| self.rejected("set", err))?;
        self.commit("set", Some(field.path().clone()), draft);
        Ok(())
    }

    /// Write a JSON value at a path.
    pub fn set_value<S: Selector + ?Sized>(
        &mut self,
        path: &S,
        value: impl Into<Value>,
    ) -> StateResult<()> {
        let path = path.to_path().map_err(|err| self.rejected("set", err))?;
        self.dispatch(Command::set(path, value))
    }

    /// Append a default element to a list.
    pub fn append<S: Selector + ?Sized>(&mut self, list: &S) -> StateResult<()> {
        let path = list.to_path().map_err(|err| self.rejected("append", err))?;
        self.dispatch(Command::append(path))
    }

    /// Remove a list element.
    pub fn remove_at<S: Selector + ?Sized>(&mut self, list: &S, index: usize) -> StateResult<()> {
        let path = list.to_path().map_err(|err| self.rejected("remove_at", err))?;
        self.dispatch(Command::remove_at(path, index))
    }

    /// Insert a copy of a list element right after it, with fresh ids.
    pub fn duplicate_at<S: Selector + ?Sized>(&mut self, list: &S, index: usize) -> StateResult<()> {
        let path = list.to_path().map_err(|err| self.rejected("duplicate_at", err))?;
        self.dispatch(Command::duplicate_at(path, index))
    }

    /// Move a list element from one index to another.
    pub fn move_item<S: Selector + ?Sized>(
        &mut self,
        list: &S,
        from: usize,
        to: usize,
    ) -> StateResult<()> {
        let path = list.to_path().map_err(|err| self.rejected("move", err))?;
        self.dispatch(Command::move_item(path, from, to))
    }

    /// Reorder a list by index permutation.
    pub fn reorder_by<S: Selector + ?Sized>(&mut self, list: &S, order: Vec<usize>) -> StateResult<()> {
        let path = list.to_path().map_err(|err| self.rejected("reorder", err))?;
        self.dispatch(Command::reorder(path, order))
    }

    /// Replace a list with a rearrangement of its own elements.
    ///
    /// `items` must hold exactly the current elements, as handed out by a
    /// drag-and-drop widget; anything else is rejected.
    pub fn reorder<T: State + Default>(
        &mut self,
        list: &ListLens<T>,
        items: impl IntoIterator<Item = Arc<T>>,
    ) -> StateResult<()> {
        let current = self.read(list).map_err(|err| self.rejected("reorder", err))?;
        let wanted: Vec<Arc<T>> = items.into_iter().collect();
        let Some(order) = current.positions_of(&wanted) else {
            let err = StateError::NotAPermutation {
                path: list.path().clone(),
                expected: current.len(),
                found: wanted.len(),
            };
            return Err(self.rejected("reorder", err));
        };
        self.dispatch(Command::reorder(list.path().clone(), order))
    }

    /// Restore the template.
    pub fn reset(&mut self) {
        let template = Arc::clone(&self.template);
        self.commit("reset", None, template);
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) -> StateResult<()> {
        let next = apply_command(&self.current, &self.template, &command)
            .map_err(|err| self.rejected(command.name(), err))?;
        self.commit(command.name(), command.path().cloned(), next);
        Ok(())
    }

    /// Apply several commands as one edit.
    ///
    /// Subscribers see only the final result. If any command fails nothing
    /// is committed.
    pub fn transact(&mut self, commands: impl IntoIterator<Item = Command>) -> StateResult<()> {
        let commands: Vec<Command> = commands.into_iter().collect();
        if commands.is_empty() {
            return Ok(());
        }
        let next = apply_commands(&self.current, &self.template, &commands)
            .map_err(|err| self.rejected("transact", err))?;
        debug!(count = commands.len(), "transaction applied");
        self.commit("transact", None, next);
        Ok(())
    }

    /// Watch a selected part of the document.
    ///
    /// `on_change` runs after each commit in which the selection is no
    /// longer [`same`](Selection::same) as what it last saw.
    pub fn subscribe<S, F, C>(&mut self, selector: F, mut on_change: C) -> SubscriptionId
    where
        S: Selection + Send + 'static,
        F: Fn(&R) -> S + Send + 'static,
        C: FnMut(&S) + Send + 'static,
    {
        let mut last = selector(&self.current);
        if self.config.notify_on_subscribe {
            on_change(&last);
        }
        let watch: Watch<R> = Box::new(move |doc: &R| {
            let next = selector(doc);
            if next.same(&last) {
                return false;
            }
            on_change(&next);
            last = next;
            true
        });

        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber { id, watch });
        id
    }

    /// Stop a subscription. Returns whether it was active.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        before != self.subscribers.len()
    }

    /// Retained revisions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Revision<R>> {
        self.history.iter()
    }

    /// The document as of revision `number`, if still retained.
    pub fn snapshot_at(&self, number: u64) -> Option<Arc<R>> {
        if number == 0 {
            return Some(Arc::clone(&self.template));
        }
        self.history
            .iter()
            .find(|rev| rev.number == number)
            .map(|rev| Arc::clone(&rev.snapshot))
    }

    /// Drop retained revisions. The current document is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn rejected(&self, op: &'static str, err: StateError) -> StateError {
        warn!(op, revision = self.revision, error = %err, "edit rejected");
        err
    }

    fn commit(&mut self, label: &'static str, path: Option<Path>, next: Arc<R>) {
        self.revision += 1;
        self.current = next;
        debug!(
            revision = self.revision,
            op = label,
            path = %path.as_ref().map_or_else(|| "$".to_string(), Path::to_string),
            "edit committed"
        );

        if self.config.history_limit > 0 {
            self.history.push_back(Revision {
                number: self.revision,
                label,
                path,
                snapshot: Arc::clone(&self.current),
            });
            while self.history.len() > self.config.history_limit {
                self.history.pop_front();
            }
        }

        let doc = &*self.current;
        let mut notified = 0usize;
        for sub in &mut self.subscribers {
            if (sub.watch)(doc) {
                notified += 1;
            }
        }
        trace!(
            revision = self.revision,
            notified,
            subscribers = self.subscribers.len(),
            "subscribers checked"
        );
    }
}

impl<R: State + Default> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: State> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("revision", &self.revision)
            .field("history", &self.history.len())
            .field("subscribers", &self.subscribers.len())
            .field("config", &self.config)
            .finish()
    }
}
