//! Touch input plumbing
//!
//! Touch controllers are usually polled: each sample either reports a contact
//! point or nothing. [`TouchTracker`] turns that stream of samples into the
//! press/drag/release events the element store expects, and [`TouchQueue`]
//! carries events from the driver (an interrupt handler or a polling task)
//! to the UI loop, which handles them one at a time.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use log::{trace, warn};

use crate::store::ElementStore;
use crate::ui::core::{TouchEvent, TouchPoint};

/// Converts polled touch samples into touch events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TouchTracker {
    last: Option<TouchPoint>,
}

impl TouchTracker {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Whether the pointer is currently down
    pub fn is_pressed(&self) -> bool {
        self.last.is_some()
    }

    /// Feed one sample. Returns the event it produces, if any.
    ///
    /// A sample at the same point as the previous one produces nothing. The
    /// release is reported at the last known contact point.
    pub fn update(&mut self, sample: Option<TouchPoint>) -> Option<TouchEvent> {
        let event = match (self.last, sample) {
            (None, Some(point)) => Some(TouchEvent::Press(point)),
            (Some(previous), Some(point)) if previous != point => Some(TouchEvent::Drag(point)),
            (Some(_), Some(_)) => None,
            (Some(previous), None) => Some(TouchEvent::Release(previous)),
            (None, None) => None,
        };

        self.last = sample;
        if let Some(event) = event {
            trace!("Touch sample -> {:?}", event);
        }
        event
    }
}

/// Bounded queue of touch events shared between a producer and the UI loop.
///
/// The queue can live in a `static` and be filled from interrupt context.
pub struct TouchQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, TouchEvent, N>,
}

impl<const N: usize> Default for TouchQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TouchQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue an event. When the queue is full the event is handed back.
    pub fn push(&self, event: TouchEvent) -> Result<(), TouchEvent> {
        self.channel.try_send(event).map_err(|err| {
            let embassy_sync::channel::TrySendError::Full(event) = err;
            warn!("Touch queue full, dropping {:?}", event);
            event
        })
    }

    /// Dequeue the oldest event, if any.
    pub fn pop(&self) -> Option<TouchEvent> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Sending half for async producers
    pub fn sender(&self) -> Sender<'_, CriticalSectionRawMutex, TouchEvent, N> {
        self.channel.sender()
    }

    /// Receiving half for an async UI task
    pub fn receiver(&self) -> Receiver<'_, CriticalSectionRawMutex, TouchEvent, N> {
        self.channel.receiver()
    }

    /// Hand every queued event to the store in arrival order.
    ///
    /// Returns the number of events processed.
    pub fn drain_into<const PAGES: usize, const ELEMS: usize>(
        &self,
        store: &mut ElementStore<PAGES, ELEMS>,
    ) -> usize {
        let mut count = 0;
        while let Some(event) = self.pop() {
            store.handle_touch(event);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::core::{ElementIdRequest, PageId};
    use crate::ui::styling::{ElementStyle, RED};
    use crate::widgets::{CheckStyle, Checkbox};
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    fn p(x: u16, y: u16) -> TouchPoint {
        TouchPoint::new(x, y)
    }

    #[test]
    fn test_tracker_sequence() {
        let mut tracker = TouchTracker::new();

        assert_eq!(tracker.update(None), None);
        assert_eq!(tracker.update(Some(p(1, 2))), Some(TouchEvent::Press(p(1, 2))));
        assert!(tracker.is_pressed());
        assert_eq!(tracker.update(Some(p(1, 2))), None, "no motion, no drag");
        assert_eq!(tracker.update(Some(p(5, 2))), Some(TouchEvent::Drag(p(5, 2))));
        assert_eq!(tracker.update(None), Some(TouchEvent::Release(p(5, 2))));
        assert!(!tracker.is_pressed());
        assert_eq!(tracker.update(None), None);
    }

    #[test]
    fn test_queue_is_bounded_and_ordered() {
        let queue: TouchQueue<2> = TouchQueue::new();

        assert!(queue.push(TouchEvent::Press(p(1, 1))).is_ok());
        assert!(queue.push(TouchEvent::Drag(p(2, 1))).is_ok());
        assert_eq!(
            queue.push(TouchEvent::Release(p(2, 1))),
            Err(TouchEvent::Release(p(2, 1)))
        );
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(), Some(TouchEvent::Press(p(1, 1))));
        assert_eq!(queue.pop(), Some(TouchEvent::Drag(p(2, 1))));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_into_store() {
        let mut store: ElementStore<1, 4> = ElementStore::default();
        store.add_page(PageId(0)).unwrap();
        let id = store
            .create_checkbox(
                PageId(0),
                ElementIdRequest::Auto,
                Rectangle::new(Point::new(0, 0), Size::new(20, 20)),
                ElementStyle::default(),
                Checkbox::new(false, CheckStyle::Box, RED, false),
                None,
            )
            .unwrap();

        let queue: TouchQueue<4> = TouchQueue::new();
        let mut tracker = TouchTracker::new();
        for sample in [Some(p(5, 5)), Some(p(6, 5)), None] {
            if let Some(event) = tracker.update(sample) {
                queue.push(event).unwrap();
            }
        }

        assert_eq!(queue.drain_into(&mut store), 3);
        assert!(store.checkbox_state(PageId(0), id).unwrap());
    }
}
