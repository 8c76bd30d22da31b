//! Push-based broadcast primitives
//!
//! A [`Signal`] holds a current value, replays it to every new subscriber and
//! only broadcasts when a new value differs from the current one
//! (distinct-until-changed). An [`EventStream`] broadcasts every emitted value
//! and replays nothing.
//!
//! Subscribers receive values over unbounded crossbeam channels. Subscribers
//! whose receiver has been dropped are pruned on the next broadcast.

use crossbeam_channel::{unbounded, Receiver};
use std::fmt;

type Subscriber<T> = Box<dyn Fn(&T) -> bool + Send>;

fn subscriber<T, U, F>(map: F) -> (Subscriber<T>, Receiver<U>)
where
    U: Send + 'static,
    F: Fn(&T) -> U + Send + 'static,
{
    let (tx, rx) = unbounded();
    let sub: Subscriber<T> = Box::new(move |value| tx.send(map(value)).is_ok());
    (sub, rx)
}

/// Latest-value cell with change suppression
pub struct Signal<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value` and broadcast it, unless it equals the current value.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.publish(value);
        true
    }

    /// Store `value` and broadcast it even if it equals the current value
    pub fn publish(&mut self, value: T) {
        self.value = value;
        let current = &self.value;
        self.subscribers.retain(|sub| sub(current));
    }

    pub fn subscribe(&mut self) -> Receiver<T>
    where
        T: Send + 'static,
    {
        self.subscribe_map(T::clone)
    }

    /// Subscribe to a projection of this signal.
    ///
    /// The projection is applied to the current value immediately and to every
    /// later change; it is not itself change-suppressed.
    pub fn subscribe_map<U, F>(&mut self, map: F) -> Receiver<U>
    where
        U: Send + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        let (sub, rx) = subscriber(map);
        if sub(&self.value) {
            self.subscribers.push(sub);
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Broadcast stream of discrete events, no replay
pub struct EventStream<T> {
    subscribers: Vec<Subscriber<T>>,
}

impl<T> EventStream<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn emit(&mut self, value: &T) {
        self.subscribers.retain(|sub| sub(value));
    }

    pub fn subscribe(&mut self) -> Receiver<T>
    where
        T: Clone + Send + 'static,
    {
        self.subscribe_map(T::clone)
    }

    pub fn subscribe_map<U, F>(&mut self, map: F) -> Receiver<U>
    where
        U: Send + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        let (sub, rx) = subscriber(map);
        self.subscribers.push(sub);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
