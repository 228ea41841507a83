//! Access to compressed frames.
//!
//! Frame bytes are owned by whatever reads the map files; the raster source
//! only borrows frames through [`FrameStore`] for the duration of a decode.

use std::collections::{HashMap, VecDeque};

use crate::rpf::{CompressedFrame, FrameSynth};
use crate::zone::Zone;

/// Supplies compressed frames for a zone's frame grid.
pub trait FrameStore {
    /// The frame at (`frame_row`, `frame_col`) of `zone`, if one exists.
    fn frame(&mut self, zone: &Zone, frame_row: u32, frame_col: u32) -> Option<&CompressedFrame>;

    /// Called when the active zone changes. Stores holding frames of the
    /// previous zone may drop them.
    fn zone_changed(&mut self, _zone: Option<&Zone>) {}
}

/// Frames held in memory, keyed by zone name and frame position.
#[derive(Debug, Default)]
pub struct InMemoryFrameStore {
    frames: HashMap<(String, u32, u32), CompressedFrame>,
}

impl InMemoryFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a frame, replacing any previous frame at the same position.
    pub fn insert(
        &mut self,
        zone_name: impl Into<String>,
        frame_row: u32,
        frame_col: u32,
        frame: CompressedFrame,
    ) {
        self.frames
            .insert((zone_name.into(), frame_row, frame_col), frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameStore for InMemoryFrameStore {
    fn frame(&mut self, zone: &Zone, frame_row: u32, frame_col: u32) -> Option<&CompressedFrame> {
        self.frames.get(&(zone.name.clone(), frame_row, frame_col))
    }
}

/// Frames a [`SyntheticFrameStore`] keeps by default.
pub const DEFAULT_SYNTHETIC_FRAMES: usize = 16;

/// Generates synthetic frames on first access.
///
/// Only frames of the most recently requested zone are kept, at most
/// `capacity` of them; the oldest is dropped first and regenerated on demand.
#[derive(Debug)]
pub struct SyntheticFrameStore {
    synth: FrameSynth,
    capacity: usize,
    zone: Option<String>,
    frames: HashMap<(u32, u32), CompressedFrame>,
    order: VecDeque<(u32, u32)>,
    generated: u64,
}

impl Default for SyntheticFrameStore {
    fn default() -> Self {
        Self::new(FrameSynth::default())
    }
}

impl SyntheticFrameStore {
    pub fn new(synth: FrameSynth) -> Self {
        Self {
            synth,
            capacity: DEFAULT_SYNTHETIC_FRAMES,
            zone: None,
            frames: HashMap::new(),
            order: VecDeque::new(),
            generated: 0,
        }
    }

    /// Set how many frames are kept (at least one).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Number of frames generated so far, regenerations included.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Number of frames currently kept.
    pub fn cached(&self) -> usize {
        self.frames.len()
    }

    fn clear(&mut self) {
        self.frames.clear();
        self.order.clear();
    }
}

impl FrameStore for SyntheticFrameStore {
    fn frame(&mut self, zone: &Zone, frame_row: u32, frame_col: u32) -> Option<&CompressedFrame> {
        if frame_row >= zone.grid_rows || frame_col >= zone.grid_cols {
            return None;
        }
        if self.zone.as_deref() != Some(zone.name.as_str()) {
            self.clear();
            self.zone = Some(zone.name.clone());
        }

        let key = (frame_row, frame_col);
        if !self.frames.contains_key(&key) {
            while self.frames.len() >= self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.frames.remove(&oldest);
            }
            self.frames.insert(key, self.synth.frame(frame_row, frame_col));
            self.order.push_back(key);
            self.generated += 1;
        }
        self.frames.get(&key)
    }

    fn zone_changed(&mut self, zone: Option<&Zone>) {
        if self.zone.as_deref() != zone.map(|z| z.name.as_str()) {
            self.clear();
            self.zone = zone.map(|z| z.name.clone());
        }
    }
}
