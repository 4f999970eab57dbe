//! The single-threaded frame loop
//!
//! Each frame renders the current layout, drains pending input, dispatches
//! the resulting commands and advances the physics by one tick.

use std::collections::VecDeque;

use crate::decomposition::PlanarDecomposer;
use crate::frame::{build_frame, Canvas};
use crate::input::{command_for, InputEvent};
use crate::sampler::ColorSampler;
use crate::world::SimulationWorld;

/// Non-blocking source of decoded input events
pub trait EventSource {
    /// Every event pending since the last poll; empty when there are none
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Replays a fixed list of per-frame event batches, then reports nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedEvents {
    /// Batch `i` is delivered on the `i`-th poll
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Batches not yet delivered
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Polygons drawn
    pub polygons: usize,
    /// Commands dispatched to the world
    pub commands: usize,
    /// `false` once a quit command has been seen
    pub running: bool,
}

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames completed
    pub frames: u64,
    /// Frames that drew nothing because the layout was degenerate
    pub empty_frames: u64,
    /// Polygons drawn over all frames
    pub polygons: u64,
}

/// A world, the decomposer matching its configuration, and a color source
pub struct Session<S> {
    world: SimulationWorld,
    decomposer: PlanarDecomposer,
    sampler: S,
}

impl<S: ColorSampler> Session<S> {
    /// Wire a world to a sampler; the decomposer follows the world's config and bounds
    pub fn new(world: SimulationWorld, sampler: S) -> Self {
        let decomposer = PlanarDecomposer::new(world.config().region_policy, world.bounds());
        Self {
            world,
            decomposer,
            sampler,
        }
    }

    /// The simulated world
    #[inline]
    pub fn world(&self) -> &SimulationWorld {
        &self.world
    }

    /// Mutable access to the simulated world
    #[inline]
    pub fn world_mut(&mut self) -> &mut SimulationWorld {
        &mut self.world
    }

    /// Render, handle input, then tick once
    ///
    /// Every pending event is handled even after a quit, matching a loop that
    /// only checks its running flag between frames.
    pub fn step<C, E>(&mut self, canvas: &mut C, events: &mut E) -> FrameReport
    where
        C: Canvas + ?Sized,
        E: EventSource + ?Sized,
    {
        let frame = build_frame(&self.world, &self.decomposer, &self.sampler);
        frame.draw(canvas);

        let mut running = true;
        let mut commands = 0;
        for command in events.poll_events().iter().filter_map(command_for) {
            commands += 1;
            running &= self.world.apply(command);
        }

        self.world.advance();

        tracing::trace!(
            tick = self.world.ticks(),
            polygons = frame.polygon_count(),
            commands,
            "frame"
        );

        FrameReport {
            polygons: frame.polygon_count(),
            commands,
            running,
        }
    }

    /// Run frames until a quit command, or until `max_frames` have completed
    pub fn run<C, E>(&mut self, canvas: &mut C, events: &mut E, max_frames: Option<u64>) -> RunSummary
    where
        C: Canvas + ?Sized,
        E: EventSource + ?Sized,
    {
        let mut summary = RunSummary::default();
        while max_frames.map_or(true, |limit| summary.frames < limit) {
            let report = self.step(canvas, events);
            summary.frames += 1;
            summary.polygons += report.polygons as u64;
            if report.polygons == 0 {
                summary.empty_frames += 1;
            }
            if !report.running {
                break;
            }
        }
        tracing::info!(
            frames = summary.frames,
            empty_frames = summary.empty_frames,
            polygons = summary.polygons,
            "run finished"
        );
        summary
    }
}
