//! Generic multi-item selection.
//!
//! A [`Selection`] owns the selected set, the per-item callbacks and a
//! [`SelectionStrategy`] deciding what an interaction with some items does to
//! the set. Per-item callbacks fire only for items whose state really changed;
//! change listeners fire once per public call.

use crate::state::config::SelectionMode;
use indexmap::IndexSet;
use std::hash::Hash;

type ItemCallback<T> = Box<dyn FnMut(&T)>;
type ChangeListener<T> = Box<dyn FnMut(&[T])>;

/// Invoked once per item entering or leaving the selection
pub struct SelectionCallbacks<T> {
    pub on_select: ItemCallback<T>,
    pub on_unselect: ItemCallback<T>,
}

impl<T> Default for SelectionCallbacks<T> {
    fn default() -> Self {
        Self {
            on_select: Box::new(|_| {}),
            on_unselect: Box::new(|_| {}),
        }
    }
}

impl<T> SelectionCallbacks<T> {
    pub fn new(on_select: impl FnMut(&T) + 'static, on_unselect: impl FnMut(&T) + 'static) -> Self {
        Self {
            on_select: Box::new(on_select),
            on_unselect: Box::new(on_unselect),
        }
    }
}

/// The selected set plus the hooks strategies drive. Strategies mutate it
/// only through these methods, so callbacks stay in step with the set.
pub struct SelectionState<T> {
    items: IndexSet<T>,
    callbacks: SelectionCallbacks<T>,
    modifier: Box<dyn Fn() -> bool>,
}

impl<T: Clone + Eq + Hash> SelectionState<T> {
    fn new(callbacks: SelectionCallbacks<T>) -> Self {
        Self {
            items: IndexSet::new(),
            callbacks,
            modifier: Box::new(|| false),
        }
    }

    /// Returns true when `item` was not selected before
    pub fn add(&mut self, item: &T) -> bool {
        if !self.items.insert(item.clone()) {
            return false;
        }
        (self.callbacks.on_select)(item);
        true
    }

    /// Returns true when `item` was selected before
    pub fn remove(&mut self, item: &T) -> bool {
        if !self.items.shift_remove(item) {
            return false;
        }
        (self.callbacks.on_unselect)(item);
        true
    }

    pub fn toggle(&mut self, item: &T) {
        if !self.remove(item) {
            self.add(item);
        }
    }

    pub fn clear_all(&mut self) {
        for item in std::mem::take(&mut self.items) {
            (self.callbacks.on_unselect)(&item);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Whether the multi-select modifier (Ctrl) is held right now
    pub fn multi_select_modifier(&self) -> bool {
        (self.modifier)()
    }
}

pub trait SelectionStrategy<T> {
    fn update(&self, state: &mut SelectionState<T>, items: &[T]);
}

/// Radio buttons: the interacted items replace the selection
#[derive(Debug, Clone, Copy, Default)]
pub struct Exclusive;

/// Checkboxes: every interacted item flips
#[derive(Debug, Clone, Copy, Default)]
pub struct Toggle;

/// File-explorer clicks: without the modifier the selection is cleared
/// first, then every interacted item flips.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl<T: Clone + Eq + Hash> SelectionStrategy<T> for Exclusive {
    fn update(&self, state: &mut SelectionState<T>, items: &[T]) {
        state.clear_all();
        for item in items {
            state.add(item);
        }
    }
}

impl<T: Clone + Eq + Hash> SelectionStrategy<T> for Toggle {
    fn update(&self, state: &mut SelectionState<T>, items: &[T]) {
        for item in items {
            state.toggle(item);
        }
    }
}

impl<T: Clone + Eq + Hash> SelectionStrategy<T> for Standard {
    fn update(&self, state: &mut SelectionState<T>, items: &[T]) {
        if !state.multi_select_modifier() {
            state.clear_all();
        }
        for item in items {
            state.toggle(item);
        }
    }
}

pub struct Selection<T> {
    state: SelectionState<T>,
    strategy: Box<dyn SelectionStrategy<T>>,
    listeners: Vec<ChangeListener<T>>,
}

impl<T: Clone + Eq + Hash + 'static> Selection<T> {
    pub fn with_strategy(strategy: impl SelectionStrategy<T> + 'static, callbacks: SelectionCallbacks<T>) -> Self {
        Self {
            state: SelectionState::new(callbacks),
            strategy: Box::new(strategy),
            listeners: Vec::new(),
        }
    }

    pub fn exclusive(callbacks: SelectionCallbacks<T>) -> Self {
        Self::with_strategy(Exclusive, callbacks)
    }

    pub fn toggle(callbacks: SelectionCallbacks<T>) -> Self {
        Self::with_strategy(Toggle, callbacks)
    }

    /// `modifier` reports whether the multi-select key is held
    pub fn standard(callbacks: SelectionCallbacks<T>, modifier: impl Fn() -> bool + 'static) -> Self {
        let mut selection = Self::with_strategy(Standard, callbacks);
        selection.state.modifier = Box::new(modifier);
        selection
    }

    pub fn for_mode(mode: SelectionMode, callbacks: SelectionCallbacks<T>, modifier: impl Fn() -> bool + 'static) -> Self {
        match mode {
            SelectionMode::Exclusive => Self::exclusive(callbacks),
            SelectionMode::Toggle => Self::toggle(callbacks),
            SelectionMode::Standard => Self::standard(callbacks, modifier),
        }
    }

    pub fn on_changed(&mut self, listener: impl FnMut(&[T]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply the strategy to the items the user just interacted with
    pub fn update(&mut self, items: &[T]) {
        self.strategy.update(&mut self.state, items);
        self.notify();
    }

    pub fn clear(&mut self) {
        self.state.clear_all();
        self.notify();
    }

    pub fn select(&mut self, item: &T) {
        self.state.add(item);
        self.notify();
    }

    pub fn select_all(&mut self, items: &[T]) {
        for item in items {
            self.state.add(item);
        }
        self.notify();
    }

    pub fn unselect(&mut self, item: &T) {
        self.state.remove(item);
        self.notify();
    }

    pub fn unselect_all(&mut self, items: &[T]) {
        for item in items {
            self.state.remove(item);
        }
        self.notify();
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.state.contains(item)
    }

    /// Selected items in the order they were selected
    pub fn selected_items(&self) -> Vec<T> {
        self.state.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let items = self.selected_items();
        for listener in &mut self.listeners {
            listener(&items);
        }
    }
}
