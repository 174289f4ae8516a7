//! The timer store reducer

use std::collections::HashMap;

use chrono::Local;
use tracing::{debug, info};

use super::{
    grouped_by_category, Action, CategoryGroup, CompletionRecord, IdGenerator, Timer, TimerForm,
    TimerId,
};

/// Emitted when a running timer reaches its end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub timer_id: TimerId,
    pub name: String,
    pub record: CompletionRecord,
}

/// Owns the timer list, completion history and the display-only state around them
#[derive(Debug, Default)]
pub struct TimerStore {
    timers: Vec<Timer>,
    history: Vec<CompletionRecord>,
    collapsed: HashMap<String, bool>,
    form: TimerForm,
    notification: Option<String>,
    ids: IdGenerator,
}

impl TimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn history(&self) -> &[CompletionRecord] {
        &self.history
    }

    pub fn form(&self) -> &TimerForm {
        &self.form
    }

    /// Name of the completed timer awaiting acknowledgement
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn is_collapsed(&self, category: &str) -> bool {
        self.collapsed.get(category).copied().unwrap_or(false)
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Sections for display, recomputed on each call
    pub fn grouped(&self) -> Vec<CategoryGroup> {
        grouped_by_category(&self.timers)
    }

    /// Apply one operation. Unknown ids and categories are silent no-ops.
    pub fn apply(&mut self, action: Action) -> Option<Completion> {
        match action {
            Action::AddTimer { name, category, duration } => {
                self.add_timer(name, category, duration);
            }
            Action::Tick(id) => {
                if let Some(timer) = self.timer_mut(&id) {
                    if timer.running && timer.remaining > 0 {
                        timer.remaining -= 1;
                        debug!("Timer {} ticked, {}s remaining", timer.id, timer.remaining);
                    }
                }
            }
            Action::ToggleRunning(id) => {
                if let Some(timer) = self.timer_mut(&id) {
                    timer.running = !timer.running;
                }
            }
            Action::ResetTimer(id) => {
                if let Some(timer) = self.timer_mut(&id) {
                    timer.reset();
                }
            }
            Action::DeleteTimer(id) => {
                self.timers.retain(|t| t.id != id);
            }
            Action::CompleteTimer(id) => return self.complete(&id),
            Action::StartCategory(category) => {
                self.for_category(&category, |t| t.running = true);
            }
            Action::PauseCategory(category) => {
                self.for_category(&category, |t| t.running = false);
            }
            Action::ResetCategory(category) => {
                self.for_category(&category, Timer::reset);
            }
            Action::ToggleCategoryCollapsed(category) => {
                let flag = self.collapsed.entry(category).or_insert(false);
                *flag = !*flag;
            }
            Action::LoadTimers(timers) => {
                self.timers = timers
                    .into_iter()
                    .map(|mut t| {
                        t.remaining = t.remaining.min(t.duration);
                        t
                    })
                    .collect();
                self.ids.observe(self.timers.iter().map(|t| t.id.as_str()));
            }
            Action::LoadHistory(history) => {
                self.history = history;
                self.ids.observe(self.history.iter().map(|r| r.id.as_str()));
            }
            Action::SetFormName(name) => self.form.name = name,
            Action::SetFormDuration(duration) => self.form.duration = duration,
            Action::SetFormCategory(category) => self.form.category = category,
            Action::SetAttemptedSubmit(attempted) => self.form.attempted_submit = attempted,
            Action::DismissNotification => self.notification = None,
        }
        None
    }

    /// Append a stopped timer and clear the form draft; returns the new timer
    pub fn add_timer(&mut self, name: String, category: String, duration: u64) -> Timer {
        let id = self.ids.next_id();
        info!("Adding timer {} '{}' in '{}' for {}s", id, name, category, duration);
        let timer = Timer::new(id, name, category, duration);
        self.timers.push(timer.clone());
        self.form.clear();
        timer
    }

    /// Run one clock fire: tick running timers, complete running timers at zero.
    ///
    /// Decisions are made against the live list, so a timer reset or deleted
    /// before the fire is never completed.
    pub fn fire(&mut self) -> Vec<Completion> {
        let due: Vec<(TimerId, bool)> = self
            .timers
            .iter()
            .filter(|t| t.running)
            .map(|t| (t.id.clone(), t.remaining > 0))
            .collect();

        let mut completions = Vec::new();
        for (id, ticking) in due {
            if ticking {
                self.apply(Action::Tick(id));
            } else {
                debug!("Timer {} reached zero", id);
                completions.extend(self.apply(Action::CompleteTimer(id)));
            }
        }
        completions
    }

    fn complete(&mut self, id: &str) -> Option<Completion> {
        let timer = self.timers.iter_mut().find(|t| t.id == id)?;
        timer.running = false;
        let name = timer.name.clone();

        let record = CompletionRecord::new(self.ids.next_id(), name.clone(), Local::now());
        info!("Timer {} '{}' completed at {}", id, name, record.time);
        self.history.push(record.clone());
        self.notification = Some(name.clone());

        Some(Completion {
            timer_id: id.to_string(),
            name,
            record,
        })
    }

    fn timer_mut(&mut self, id: &str) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id == id)
    }

    fn for_category(&mut self, category: &str, mut update: impl FnMut(&mut Timer)) {
        self.timers
            .iter_mut()
            .filter(|t| t.category == category)
            .for_each(|t| update(t));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(store: &mut TimerStore, name: &str, category: &str, duration: u64) -> TimerId {
        store.apply(Action::AddTimer {
            name: name.into(),
            category: category.into(),
            duration,
        });
        store.timers().last().unwrap().id.clone()
    }

    fn assert_bounds(store: &TimerStore) {
        for t in store.timers() {
            assert!(t.remaining <= t.duration, "{t:?}");
        }
    }

    #[test]
    fn add_appends_stopped_timer_and_clears_form() {
        let mut store = TimerStore::new();
        store.apply(Action::SetFormName("Study".into()));
        store.apply(Action::SetAttemptedSubmit(true));
        let id = add(&mut store, "Study", "Work", 25);

        let timer = store.timer(&id).unwrap();
        assert_eq!((timer.remaining, timer.running), (25, false));
        assert_eq!(store.form(), &TimerForm::default());
    }

    #[test]
    fn tick_only_moves_running_timers() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "Tea", "Home", 2);

        store.apply(Action::Tick(id.clone()));
        assert_eq!(store.timer(&id).unwrap().remaining, 2);

        store.apply(Action::ToggleRunning(id.clone()));
        for _ in 0..5 {
            store.apply(Action::Tick(id.clone()));
            assert_bounds(&store);
        }
        let timer = store.timer(&id).unwrap();
        assert_eq!(timer.remaining, 0);
        assert!(timer.running, "tick never changes running");
    }

    #[test]
    fn complete_stops_timer_and_records_history_once() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "Study", "Work", 1);
        store.apply(Action::ToggleRunning(id.clone()));
        store.apply(Action::Tick(id.clone()));

        let completion = store.apply(Action::CompleteTimer(id.clone())).unwrap();
        assert_eq!(completion.name, "Study");
        assert_ne!(completion.record.id, id);
        assert!(!store.timer(&id).unwrap().running);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].name, "Study");
        assert_eq!(store.notification(), Some("Study"));

        store.apply(Action::DismissNotification);
        assert_eq!(store.notification(), None);
    }

    #[test]
    fn fire_ticks_then_completes_on_the_following_fire() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "Tea", "Home", 1);
        let idle = add(&mut store, "Idle", "Home", 5);
        store.apply(Action::ToggleRunning(id.clone()));

        assert!(store.fire().is_empty());
        assert_eq!(store.timer(&id).unwrap().remaining, 0);

        let completions = store.fire();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].timer_id, id);
        assert!(!store.timer(&id).unwrap().running);
        assert_eq!(store.timer(&idle).unwrap().remaining, 5);

        assert!(store.fire().is_empty());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn fire_skips_a_finished_timer_reset_before_it() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "Tea", "Home", 1);
        store.apply(Action::ToggleRunning(id.clone()));
        store.fire();
        assert!(store.timer(&id).unwrap().is_finished());

        store.apply(Action::ResetTimer(id.clone()));
        assert!(store.fire().is_empty());
        assert!(store.history().is_empty());
        assert_eq!(store.timer(&id).unwrap().remaining, 1);
    }

    #[test]
    fn complete_with_unknown_id_changes_nothing() {
        let mut store = TimerStore::new();
        add(&mut store, "Study", "Work", 1);
        let before = store.timers().to_vec();

        assert!(store.apply(Action::CompleteTimer("missing".into())).is_none());
        assert_eq!(store.timers(), before.as_slice());
        assert!(store.history().is_empty());
        assert!(store.notification().is_none());
    }

    #[test]
    fn reset_restores_duration_from_any_state() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "Run", "Gym", 3);
        store.apply(Action::ToggleRunning(id.clone()));
        store.apply(Action::Tick(id.clone()));
        store.apply(Action::ResetTimer(id.clone()));

        let timer = store.timer(&id).unwrap();
        assert_eq!((timer.remaining, timer.running), (3, false));
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = TimerStore::new();
        let a = add(&mut store, "A", "x", 1);
        let b = add(&mut store, "B", "y", 2);
        let c = add(&mut store, "C", "x", 3);
        let before: Vec<Timer> = store.timers().to_vec();

        store.apply(Action::DeleteTimer(b));
        assert_eq!(store.timers(), &[before[0].clone(), before[2].clone()]);
        assert_eq!(store.timers()[0].id, a);
        assert_eq!(store.timers()[1].id, c);

        store.apply(Action::DeleteTimer("missing".into()));
        assert_eq!(store.timers().len(), 2);
    }

    #[test]
    fn category_bulk_operations_touch_only_matches() {
        let mut store = TimerStore::new();
        let w1 = add(&mut store, "A", "Work", 5);
        let h = add(&mut store, "B", "Home", 5);
        let w2 = add(&mut store, "C", "Work", 7);

        store.apply(Action::StartCategory("Work".into()));
        assert!(store.timer(&w1).unwrap().running);
        assert!(store.timer(&w2).unwrap().running);
        assert!(!store.timer(&h).unwrap().running);

        store.apply(Action::Tick(w2.clone()));
        store.apply(Action::PauseCategory("Work".into()));
        assert!(!store.timer(&w1).unwrap().running);
        assert_eq!(store.timer(&w2).unwrap().remaining, 6);

        store.apply(Action::ResetCategory("Work".into()));
        assert_eq!(store.timer(&w2).unwrap().remaining, 7);
    }

    #[test]
    fn start_category_restarts_finished_timers() {
        let mut store = TimerStore::new();
        let id = add(&mut store, "A", "Work", 1);
        store.apply(Action::ToggleRunning(id.clone()));
        store.apply(Action::Tick(id.clone()));
        store.apply(Action::CompleteTimer(id.clone()));

        store.apply(Action::StartCategory("Work".into()));
        let timer = store.timer(&id).unwrap();
        assert!(timer.running && timer.is_finished());
    }

    #[test]
    fn collapse_flag_toggles_without_touching_timers() {
        let mut store = TimerStore::new();
        add(&mut store, "A", "Work", 1);
        let before = store.timers().to_vec();

        store.apply(Action::ToggleCategoryCollapsed("Work".into()));
        assert!(store.is_collapsed("Work"));
        store.apply(Action::ToggleCategoryCollapsed("Work".into()));
        assert!(!store.is_collapsed("Work"));
        assert_eq!(store.timers(), before.as_slice());
    }

    #[test]
    fn load_replaces_instead_of_merging() {
        let mut store = TimerStore::new();
        add(&mut store, "Old", "Work", 1);

        let mut loaded = Timer::new("7".into(), "New".into(), "Home".into(), 10);
        loaded.remaining = 99;
        store.apply(Action::LoadTimers(vec![loaded]));
        assert_eq!(store.timers().len(), 1);
        assert_eq!(store.timers()[0].name, "New");
        assert_eq!(store.timers()[0].remaining, 10);

        let record = CompletionRecord {
            id: "8".into(),
            name: "Done".into(),
            time: "1/1/2026, 9:00:00 AM".into(),
        };
        store.apply(Action::LoadHistory(vec![record.clone()]));
        store.apply(Action::LoadHistory(vec![record]));
        assert_eq!(store.history().len(), 1);
    }
}
