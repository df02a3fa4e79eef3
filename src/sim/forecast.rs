//! Forecast queue
//!
//! Bounces are produced by the predictor in batches and consumed one at a time
//! by the frame step, strictly in order. The queue tracks how many entries
//! have been produced and consumed since the last reset so callers never read
//! past the produced frontier.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::predict::ForecastBatch;

/// One predicted wall collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    /// Where the body center meets the wall
    pub point: DVec2,
    /// Rotation applied to velocity at the wall (2x the incidence angle)
    pub angle: f64,
}

impl Bounce {
    pub fn new(point: DVec2, angle: f64) -> Self {
        Self { point, angle }
    }
}

/// FIFO of pending bounces with produced/consumed cursors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastQueue {
    pending: VecDeque<Bounce>,
    produced: usize,
    consumed: usize,
    rest_point: Option<DVec2>,
    exhausted: bool,
}

impl ForecastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything, e.g. after the trajectory changed discontinuously
    pub fn reset(&mut self) {
        self.pending.clear();
        self.produced = 0;
        self.consumed = 0;
        self.rest_point = None;
        self.exhausted = false;
    }

    /// Append a predictor batch
    pub fn extend(&mut self, batch: &ForecastBatch) {
        debug_assert!(!self.exhausted, "extending an exhausted forecast");
        self.pending.extend(batch.bounces.iter().copied());
        self.produced += batch.bounces.len();
        if batch.terminated {
            self.exhausted = true;
            self.rest_point = batch.rest_point;
        }
    }

    /// Next bounce to reach, if one has been produced
    #[inline]
    pub fn front(&self) -> Option<Bounce> {
        self.pending.front().copied()
    }

    /// Mark the front bounce as reached
    pub fn consume(&mut self) -> Option<Bounce> {
        let bounce = self.pending.pop_front()?;
        self.consumed += 1;
        Some(bounce)
    }

    /// Next bounce, running `replenish` synchronously if the queue ran dry
    pub fn front_or_replenish(&mut self, mut replenish: impl FnMut() -> ForecastBatch) -> Option<Bounce> {
        while self.pending.is_empty() && !self.exhausted {
            let batch = replenish();
            let empty = batch.bounces.is_empty();
            self.extend(&batch);
            if empty && !batch.terminated {
                // Zero-depth call; nothing more will come of retrying
                break;
            }
        }
        self.front()
    }

    /// Whether another batch should be requested to keep `lookahead` bounces ready
    pub fn wants_more(&self, lookahead: usize) -> bool {
        !self.exhausted && self.pending.len() < lookahead
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The body comes to rest after the last pending bounce
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn rest_point(&self) -> Option<DVec2> {
        self.rest_point
    }

    /// Pending collision points in order, followed by the rest point if known
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.pending.iter().map(|b| b.point).chain(self.rest_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::predict::Trajectory;

    fn batch(points: &[(f64, f64)], terminated: bool) -> ForecastBatch {
        ForecastBatch {
            bounces: points
                .iter()
                .map(|&(x, y)| Bounce::new(DVec2::new(x, y), 1.0))
                .collect(),
            rest_point: terminated.then_some(DVec2::new(9.0, 9.0)),
            terminated,
            end: Trajectory::default(),
        }
    }

    #[test]
    fn test_consumes_in_order() {
        let mut queue = ForecastQueue::new();
        queue.extend(&batch(&[(1.0, 0.0), (2.0, 0.0)], false));
        queue.extend(&batch(&[(3.0, 0.0)], false));

        assert_eq!(queue.produced(), 3);
        let xs: Vec<f64> = std::iter::from_fn(|| queue.consume()).map(|b| b.point.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(queue.consumed(), 3);
        assert!(queue.front().is_none());
    }

    #[test]
    fn test_replenishes_when_dry() {
        let mut queue = ForecastQueue::new();
        let mut calls = 0;
        let front = queue.front_or_replenish(|| {
            calls += 1;
            batch(&[(5.0, 5.0)], false)
        });
        assert_eq!(front.map(|b| b.point), Some(DVec2::new(5.0, 5.0)));
        assert_eq!(calls, 1);

        // Not dry: no call
        queue.front_or_replenish(|| unreachable!("queue still has a pending bounce"));
    }

    #[test]
    fn test_exhausted_queue_stops_replenishing() {
        let mut queue = ForecastQueue::new();
        queue.extend(&batch(&[(1.0, 1.0)], true));
        assert!(queue.is_exhausted());
        assert!(!queue.wants_more(3));
        queue.consume();
        assert!(queue.front_or_replenish(|| unreachable!("exhausted")).is_none());
        assert_eq!(queue.points().collect::<Vec<_>>(), vec![DVec2::new(9.0, 9.0)]);
    }

    #[test]
    fn test_reset_clears_cursors() {
        let mut queue = ForecastQueue::new();
        queue.extend(&batch(&[(1.0, 1.0), (2.0, 2.0)], true));
        queue.consume();
        queue.reset();
        assert_eq!((queue.produced(), queue.consumed(), queue.pending()), (0, 0, 0));
        assert!(!queue.is_exhausted());
        assert!(queue.rest_point().is_none());
        assert!(queue.wants_more(1));
    }
}
