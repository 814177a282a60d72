//! Observable state container.

use std::marker::PhantomData;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::reducer::Reducer;

/// Holds the current state of one feature and notifies subscribers.
///
/// Every mutation goes through [`Store::dispatch`], which runs the reducer
/// and publishes the result only when it differs from the previous state.
pub struct Store<R: Reducer> {
    tx: watch::Sender<R::State>,
    /// Serializes writers so derive-then-apply sequences are atomic.
    write: Mutex<()>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            write: Mutex::new(()),
            _reducer: PhantomData,
        }
    }

    /// Run the reducer on the current state.
    ///
    /// Returns `true` when the state changed (and subscribers were notified).
    pub fn dispatch(&self, intent: R::Intent) -> bool {
        let _write = self.write.lock();
        self.apply(intent)
    }

    /// Derive an intent from the current state and apply it.
    ///
    /// No other dispatch lands between the read and the reduce, so `op`
    /// never decides on a stale state. Nothing is applied when `op` fails.
    pub fn dispatch_with<T, E>(
        &self,
        op: impl FnOnce(&R::State) -> Result<(R::Intent, T), E>,
    ) -> Result<T, E> {
        let _write = self.write.lock();
        let (intent, value) = self.read(op)?;
        self.apply(intent);
        Ok(value)
    }

    fn apply(&self, intent: R::Intent) -> bool {
        self.tx.send_if_modified(|state| {
            let previous = state.clone();
            let next = R::reduce(std::mem::take(state), intent);
            let changed = next != previous;
            *state = next;
            changed
        })
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> R::State {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it.
    ///
    /// The closure must not dispatch; the state is borrowed for its duration.
    pub fn read<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
        f(&self.tx.borrow())
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvi::{Intent, StoreState};

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Counter {
        value: i32,
    }

    impl StoreState for Counter {}

    enum CounterIntent {
        Add(i32),
        Set(i32),
    }

    impl Intent for CounterIntent {}

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Intent = CounterIntent;

        fn reduce(state: Counter, intent: CounterIntent) -> Counter {
            match intent {
                CounterIntent::Add(n) => Counter {
                    value: state.value + n,
                },
                CounterIntent::Set(value) => Counter { value },
            }
        }
    }

    #[test]
    fn dispatch_reports_change() {
        let store = Store::<CounterReducer>::new(Counter::default());
        assert!(store.dispatch(CounterIntent::Add(2)));
        assert!(!store.dispatch(CounterIntent::Add(0)));
        assert_eq!(store.snapshot().value, 2);
    }

    #[test]
    fn subscribers_see_only_real_changes() {
        let store = Store::<CounterReducer>::new(Counter::default());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(CounterIntent::Add(0));
        assert!(!rx.has_changed().unwrap());

        store.dispatch(CounterIntent::Add(5));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().value, 5);
    }

    #[test]
    fn read_borrows_current_state() {
        let store = Store::<CounterReducer>::new(Counter { value: 7 });
        assert_eq!(store.read(|s| s.value * 2), 14);
    }

    #[test]
    fn dispatch_with_never_applies_stale_reads() {
        let store = std::sync::Arc::new(Store::<CounterReducer>::new(Counter::default()));
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        store
                            .dispatch_with(|s| Ok::<_, ()>((CounterIntent::Set(s.value + 1), ())))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(store.snapshot().value, 4000);
    }

    #[test]
    fn failed_dispatch_with_changes_nothing() {
        let store = Store::<CounterReducer>::new(Counter { value: 3 });
        let mut rx = store.subscribe();
        let result: Result<(), &str> = store.dispatch_with(|_| Err("refused"));
        assert_eq!(result, Err("refused"));
        assert_eq!(store.snapshot().value, 3);
        assert!(!rx.has_changed().unwrap());
    }
}
