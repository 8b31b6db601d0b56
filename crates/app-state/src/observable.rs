//! Observable state container
//!
//! An [`Observable`] owns a value, hands out snapshots, and notifies
//! subscribers whenever the value changes. Publishing is synchronous so a tap
//! handler can update state and have the renderer see it without awaiting.

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

/// Capacity of the change event channel
const EVENT_CAPACITY: usize = 16;

/// Event broadcast after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    /// Version of the value after the change
    pub version: u64,
}

#[derive(Debug)]
struct Versioned<T> {
    value: T,
    version: u64,
}

/// Publish-on-change state container
///
/// # Example
///
/// ```
/// use app_state::Observable;
///
/// let counter = Observable::new(0u32);
/// let rx = counter.subscribe();
///
/// counter.update(|n| *n += 1);
/// assert_eq!(*rx.borrow(), 1);
/// assert_eq!(counter.version(), 1);
/// ```
pub struct Observable<T> {
    /// Current value
    state: RwLock<Versioned<T>>,
    /// Latest-value sender
    value_tx: watch::Sender<T>,
    /// Change event broadcaster
    events_tx: broadcast::Sender<Change>,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq,
{
    /// Create a container holding `value`
    pub fn new(value: T) -> Self {
        let (value_tx, _) = watch::channel(value.clone());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: RwLock::new(Versioned { value, version: 0 }),
            value_tx,
            events_tx,
        }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.state.read().value.clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read().value)
    }

    /// Number of changes published so far
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    /// Replace the value
    ///
    /// Returns true if the value differed and subscribers were notified.
    pub fn set(&self, value: T) -> bool {
        let ((), changed) = self.apply(move |current| *current = value);
        changed
    }

    /// Mutate the value in place
    ///
    /// Subscribers are notified only when the mutation changed the value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.apply(f).0
    }

    fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> (R, bool) {
        let mut state = self.state.write();
        let before = state.value.clone();
        let result = f(&mut state.value);

        let changed = state.value != before;
        if changed {
            state.version += 1;
            let version = state.version;
            let snapshot = state.value.clone();
            // Publish under the write guard so watchers never see an older version
            self.publish(snapshot, version);
        }

        (result, changed)
    }

    /// Subscribe to the latest value
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.value_tx.subscribe()
    }

    /// Subscribe to change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<Change> {
        self.events_tx.subscribe()
    }

    /// Consume the container and return its value
    pub fn into_inner(self) -> T {
        self.state.into_inner().value
    }

    fn publish(&self, snapshot: T, version: u64) {
        // send_replace stores the value even when nobody is subscribed
        self.value_tx.send_replace(snapshot);
        if self.events_tx.send(Change { version }).is_err() {
            tracing::trace!("No listeners for change {}", version);
        }
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + PartialEq + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for Observable<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Observable")
            .field("value", &state.value)
            .field("version", &state.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_initial_value() {
        let observable = Observable::new(vec![1, 2, 3]);
        assert_eq!(observable.get(), vec![1, 2, 3]);
        assert_eq!(observable.version(), 0);
    }

    #[test]
    fn test_set_notifies_watchers() {
        let observable = Observable::new(String::from("a"));
        let mut rx = observable.subscribe();

        assert!(observable.set("b".to_string()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "b");
        assert_eq!(observable.version(), 1);
    }

    #[test]
    fn test_setting_same_value_is_silent() {
        let observable = Observable::new(5);
        let rx = observable.subscribe();

        assert!(!observable.set(5));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(observable.version(), 0);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let observable = Observable::new(vec![1]);
        let len = observable.update(|v| {
            v.push(2);
            v.len()
        });
        assert_eq!(len, 2);
        assert_eq!(observable.get(), vec![1, 2]);
    }

    #[test]
    fn test_update_without_change_is_silent() {
        let observable = Observable::new(vec![1]);
        let mut events = observable.subscribe_events();

        observable.update(|v| v.sort());
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_change_events_carry_versions() {
        let observable = Observable::new(0);
        let mut events = observable.subscribe_events();

        observable.set(1);
        observable.set(2);

        assert_eq!(events.try_recv().unwrap(), Change { version: 1 });
        assert_eq!(events.try_recv().unwrap(), Change { version: 2 });
    }

    #[test]
    fn test_late_subscriber_sees_latest_value() {
        let observable = Observable::new(0);
        observable.set(7);

        let rx = observable.subscribe();
        assert_eq!(*rx.borrow(), 7);
    }

    #[test]
    fn test_with_reads_in_place() {
        let observable = Observable::new(vec!["x".to_string()]);
        let first = observable.with(|v| v[0].clone());
        assert_eq!(first, "x");
    }

    #[test]
    fn test_into_inner() {
        let observable = Observable::new(3);
        observable.set(4);
        assert_eq!(observable.into_inner(), 4);
    }

    #[test]
    fn test_set_reports_change_per_call() {
        let observable = Observable::new(0);
        assert!(observable.set(1));
        assert!(!observable.set(1));
        assert!(observable.set(2));
        assert_eq!(observable.version(), 2);
    }

    #[test]
    fn test_concurrent_updates_leave_watch_current() {
        let observable = std::sync::Arc::new(Observable::new(0u64));
        let rx = observable.subscribe();

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let observable = std::sync::Arc::clone(&observable);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        observable.update(|n| *n += 1);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(observable.get(), 2000);
        assert_eq!(observable.version(), 2000);
        assert_eq!(*rx.borrow(), observable.get());
    }

    #[tokio::test]
    async fn test_watchers_wake_on_change() {
        let observable = std::sync::Arc::new(Observable::new(0));
        let mut rx = observable.subscribe();

        let writer = std::sync::Arc::clone(&observable);
        tokio::spawn(async move {
            writer.set(42);
        });

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 42);
    }
}
