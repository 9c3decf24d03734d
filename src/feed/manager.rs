use log::debug;

use crate::feed::Feed;

pub type Callback = Box<dyn Fn(&mut Feed)>;

/// A callback together with the event it listens to and where it runs
/// relative to other callbacks of that event.
pub struct Registration {
    pub event: String,
    pub keyword: String,
    pub order: i32,
    pub builtin: bool,
    pub callback: Callback,
}

/// Anything plugins can register their callbacks with.
pub trait EventManager {
    fn register(&mut self, registration: Registration);
}

/// In-process event manager.
#[derive(Default)]
pub struct PluginManager {
    registrations: Vec<Registration>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keywords registered for `event`, in the order they will run.
    pub fn keywords(&self, event: &str) -> Vec<&str> {
        self.handlers(event)
            .into_iter()
            .map(|r| r.keyword.as_str())
            .collect()
    }

    /// Runs every callback registered for `event` on `feed`, lowest order
    /// first. Equal orders run in registration order.
    pub fn fire(&self, event: &str, feed: &mut Feed) {
        for registration in self.handlers(event) {
            debug!(
                "Running {} for event {} on feed {}",
                registration.keyword, event, feed.name
            );
            (registration.callback)(feed);
        }
    }

    fn handlers(&self, event: &str) -> Vec<&Registration> {
        let mut handlers: Vec<&Registration> = self
            .registrations
            .iter()
            .filter(|r| r.event == event)
            .collect();
        handlers.sort_by_key(|r| r.order);
        handlers
    }
}

impl EventManager for PluginManager {
    fn register(&mut self, registration: Registration) {
        debug!(
            "Registered {} on event {} (order {}, builtin {})",
            registration.keyword, registration.event, registration.order, registration.builtin
        );
        self.registrations.push(registration);
    }
}
