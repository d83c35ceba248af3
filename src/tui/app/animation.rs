use crate::symbols::SymbolId;

/// Presentation-only reel spin. The spin is already settled when the animation
/// starts; frames cycle filler symbols and the reels come to rest left to
/// right on the settled outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelAnimation {
    target: Vec<SymbolId>,
    filler: Vec<SymbolId>,
    frame: u32,
    frames: u32,
}

impl ReelAnimation {
    pub fn new(target: Vec<SymbolId>, filler: Vec<SymbolId>, frames: u32) -> Self {
        Self { target, filler, frame: 0, frames }
    }

    /// Advance one frame. Returns true once every reel has stopped.
    pub fn advance(&mut self) -> bool {
        if !self.done() {
            self.frame += 1;
        }
        self.done()
    }

    pub fn done(&self) -> bool {
        self.frame >= self.frames
    }

    /// Frame at which reel `i` stops.
    fn stop_frame(&self, i: usize) -> u32 {
        let n = self.target.len().max(1) as u32;
        self.frames * (i as u32 + 1) / n
    }

    pub fn reel_stopped(&self, i: usize) -> bool {
        self.frame >= self.stop_frame(i)
    }

    /// Symbols to show this frame.
    pub fn current(&self) -> Vec<SymbolId> {
        self.target
            .iter()
            .enumerate()
            .map(|(i, &target)| {
                if self.reel_stopped(i) || self.filler.is_empty() {
                    target
                } else {
                    let k = (self.frame as usize + i * 3) % self.filler.len();
                    self.filler[k]
                }
            })
            .collect()
    }
}
