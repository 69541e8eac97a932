use log::warn;
use std::collections::VecDeque;
use trafficcore::{CaptureDetect, Detection, FrameGeometry, FrameSize};

/// Replays the detection lists a scenario scripts for each capture.
pub struct ScriptedDetector {
    frame: FrameSize,
    pending: VecDeque<Vec<Detection>>,
    captures: usize,
}

impl ScriptedDetector {
    pub fn new(frame: FrameSize) -> Self {
        Self {
            frame,
            pending: VecDeque::new(),
            captures: 0,
        }
    }

    /// Replaces whatever the previous event left unconsumed.
    pub fn load(&mut self, captures: Vec<Vec<Detection>>) {
        self.pending = captures.into();
    }

    pub fn captures(&self) -> usize {
        self.captures
    }
}

impl CaptureDetect for ScriptedDetector {
    fn capture_and_detect(&mut self) -> Vec<Detection> {
        self.captures += 1;
        self.pending.pop_front().unwrap_or_else(|| {
            warn!("Scenario has no scripted capture left for this event; treating as empty.");
            Vec::new()
        })
    }
}

impl FrameGeometry for ScriptedDetector {
    fn frame_size(&self) -> FrameSize {
        self.frame
    }
}
