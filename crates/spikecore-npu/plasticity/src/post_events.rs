// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Post-synaptic event history
//!
//! Post spikes are not applied to synapses when they happen. Each neuron
//! keeps a short, fixed-capacity history of `(time, trace)` pairs that is
//! replayed against a row when the next pre-synaptic spike arrives.

use spikecore_npu_neural::Tick;

use crate::timing::Trace;

/// Events kept per neuron, including the initial sentinel
pub const MAX_POST_SYNAPTIC_EVENTS: usize = 16;

/// A spike time and the trace written at that time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceEvent {
    pub time: Tick,
    pub trace: Trace,
}

impl TraceEvent {
    pub const fn new(time: Tick, trace: Trace) -> Self {
        Self { time, trace }
    }
}

/// Fixed-capacity, time-ordered history for one post-synaptic neuron
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEventHistory {
    events: [TraceEvent; MAX_POST_SYNAPTIC_EVENTS],
    count: usize,
}

impl PostEventHistory {
    /// History holding only the sentinel `(0, initial_trace)`
    pub fn new(initial_trace: Trace) -> Self {
        let mut events = [TraceEvent::default(); MAX_POST_SYNAPTIC_EVENTS];
        events[0] = TraceEvent::new(0, initial_trace);
        Self { events, count: 1 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Most recent event (the sentinel if no spike has been recorded)
    #[inline]
    pub fn last(&self) -> TraceEvent {
        self.events[self.count - 1]
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events[..self.count]
    }

    /// Append an event; returns `true` if the oldest event had to be discarded
    pub fn add(&mut self, time: Tick, trace: Trace) -> bool {
        let overflowed = self.count == MAX_POST_SYNAPTIC_EVENTS;
        if overflowed {
            self.events.copy_within(1.., 0);
            self.count -= 1;
        }
        self.events[self.count] = TraceEvent::new(time, trace);
        self.count += 1;
        overflowed
    }

    /// Events with `begin < time <= end`, plus the latest event at or before `begin`
    pub fn window(&self, begin: Tick, end: Tick) -> PostEventWindow<'_> {
        let events = self.events();

        // First event strictly after `begin`. The oldest event always serves
        // as the previous one, even when overflow discarded the sentinel.
        let start = events.partition_point(|e| e.time <= begin).max(1);
        let stop = events.partition_point(|e| e.time <= end).max(start);
        let previous = events[start - 1];

        PostEventWindow {
            previous,
            events: &events[start..stop],
        }
    }
}

/// Post events to replay for one synapse
#[derive(Debug, Clone)]
pub struct PostEventWindow<'h> {
    previous: TraceEvent,
    events: &'h [TraceEvent],
}

impl<'h> PostEventWindow<'h> {
    /// Latest event at or before the window start
    #[inline]
    pub fn previous(&self) -> TraceEvent {
        self.previous
    }

    #[inline]
    pub fn events(&self) -> &'h [TraceEvent] {
        self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikecore_npu_neural::StdpFixed;

    fn trace(bits: i32) -> Trace {
        StdpFixed::from_bits(bits)
    }

    #[test]
    fn test_sentinel() {
        let history = PostEventHistory::new(trace(7));
        assert_eq!(history.len(), 1);
        assert_eq!(history.last(), TraceEvent::new(0, trace(7)));
        let window = history.window(0, 100);
        assert!(window.is_empty());
        assert_eq!(window.previous(), TraceEvent::new(0, trace(7)));
    }

    #[test]
    fn test_window_bounds() {
        let mut history = PostEventHistory::new(trace(0));
        for t in [5, 10, 15, 20] {
            history.add(t, trace(t as i32));
        }

        let window = history.window(10, 20);
        let times: Vec<Tick> = window.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![15, 20]);
        assert_eq!(window.previous(), TraceEvent::new(10, trace(10)));

        let window = history.window(4, 5);
        assert_eq!(window.len(), 1);
        assert_eq!(window.previous(), TraceEvent::new(0, trace(0)));

        assert!(history.window(20, 30).is_empty());
        assert_eq!(history.window(20, 30).previous().time, 20);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let mut history = PostEventHistory::new(trace(0));
        history.add(5, trace(1));
        history.add(9, trace(1));
        let window = history.window(8, 3);
        assert!(window.is_empty());
        assert_eq!(window.previous().time, 5);
    }

    #[test]
    fn test_overflow_discards_oldest() {
        let mut history = PostEventHistory::new(trace(0));
        for t in 1..MAX_POST_SYNAPTIC_EVENTS as Tick {
            assert!(!history.add(t, trace(1)));
        }
        assert_eq!(history.len(), MAX_POST_SYNAPTIC_EVENTS);

        assert!(history.add(100, trace(2)));
        assert_eq!(history.len(), MAX_POST_SYNAPTIC_EVENTS);
        assert_eq!(history.events()[0].time, 1);
        assert_eq!(history.last(), TraceEvent::new(100, trace(2)));
    }

    #[test]
    fn test_window_after_overflow_uses_oldest_kept() {
        let mut history = PostEventHistory::new(trace(0));
        for t in 1..=20 {
            history.add(t * 10, trace(1));
        }
        let window = history.window(0, 60);
        // Events before the oldest kept one are gone
        assert_eq!(window.previous(), history.events()[0]);
        assert!(window.events().iter().all(|e| e.time > history.events()[0].time));
    }
}
