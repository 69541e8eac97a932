use std::collections::VecDeque;

use crate::prelude::{CaptureDetect, Detection, FrameGeometry, FrameSize};

/// Camera stub that replays queued detection lists; an exhausted queue
/// behaves like a failed capture.
pub struct ScriptedCamera {
    captures: VecDeque<Vec<Detection>>,
    frame: FrameSize,
    calls: usize,
}

impl ScriptedCamera {
    pub fn new(captures: Vec<Vec<Detection>>) -> Self {
        Self {
            captures: captures.into(),
            frame: FrameSize::default(),
            calls: 0,
        }
    }

    pub fn push(&mut self, detections: Vec<Detection>) {
        self.captures.push_back(detections);
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl CaptureDetect for ScriptedCamera {
    fn capture_and_detect(&mut self) -> Vec<Detection> {
        self.calls += 1;
        self.captures.pop_front().unwrap_or_default()
    }
}

impl FrameGeometry for ScriptedCamera {
    fn frame_size(&self) -> FrameSize {
        self.frame
    }
}
