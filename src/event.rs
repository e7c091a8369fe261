use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use data::DockingConfig;

/// Notifications about global settings that affect docking.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    DockingConfigChanged(DockingConfig),
    /// Any other property changed; surfaces should refresh themselves.
    PropertiesChanged,
}

type Queue = RefCell<VecDeque<Message>>;

/// Publish/subscribe channel for [`Message`]s on the UI thread.
///
/// Every subscriber gets its own queue. Messages are delivered in publish
/// order. Dropping a [`Subscription`] unsubscribes it.
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<Weak<Queue>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.borrow_mut().push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    pub fn publish(&self, message: Message) {
        log::debug!("Publishing {message:?}");

        self.subscribers.borrow_mut().retain(|subscriber| {
            subscriber.upgrade().is_some_and(|queue| {
                queue.borrow_mut().push_back(message.clone());
                true
            })
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|subscriber| subscriber.strong_count() > 0)
            .count()
    }
}

pub struct Subscription {
    queue: Rc<Queue>,
}

impl Subscription {
    /// Takes every pending message, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
