// A TickSource yields per-frame deltas, FrameScheduler fans them out to subscribers

use std::collections::VecDeque;

pub trait TickSource {
    // Seconds since the previous tick, or None once the source is exhausted
    fn next_delta(&mut self) -> Option<f32>;
}

// Constant step, never runs out
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    pub step: f32,
}

impl FixedStepClock {
    pub fn hz(rate: f32) -> Self {
        Self {
            step: 1.0 / rate.max(f32::EPSILON),
        }
    }
}

impl TickSource for FixedStepClock {
    fn next_delta(&mut self) -> Option<f32> {
        Some(self.step)
    }
}

// Deltas pushed by the host (or a test)
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: VecDeque<f32>,
}

impl ManualClock {
    pub fn push(&mut self, dt: f32) {
        self.pending.push_back(dt.max(0.0));
    }
}

impl TickSource for ManualClock {
    fn next_delta(&mut self) -> Option<f32> {
        self.pending.pop_front()
    }
}

pub trait Tickable {
    fn tick(&mut self, dt: f32);
}

impl<F: FnMut(f32)> Tickable for F {
    fn tick(&mut self, dt: f32) {
        self(dt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

pub struct FrameScheduler<'a, S: TickSource> {
    source: S,
    next_id: u64,
    subscribers: Vec<(SubscriberId, Box<dyn Tickable + 'a>)>,
    elapsed: f32,
    frames: u64,
}

impl<'a, S: TickSource> FrameScheduler<'a, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            next_id: 0,
            subscribers: Vec::new(),
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn subscribe(&mut self, subscriber: impl Tickable + 'a) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // Subscribers run in subscription order. Returns the step, if the source had one.
    pub fn tick(&mut self) -> Option<f32> {
        let dt = self.source.next_delta()?;
        for (_, s) in &mut self.subscribers {
            s.tick(dt);
        }
        self.elapsed += dt;
        self.frames += 1;
        Some(dt)
    }

    // Up to `frames` ticks; stops early if the source runs dry
    pub fn run(&mut self, frames: usize) -> usize {
        (0..frames).take_while(|_| self.tick().is_some()).count()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
