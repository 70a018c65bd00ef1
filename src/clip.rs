//! Fixed-capacity audio clip buffer.
//!
//! One clip exists for the whole process lifetime. It is allocated once at
//! startup from internal RAM and handed to the control-loop task, which is
//! the only execution context that ever touches it. The buffer is never
//! resized and never freed.

/// A recorded audio clip.
///
/// Wraps a byte region of fixed capacity and tracks how many bytes of it
/// hold valid audio from the most recent recording. Playback reads only the
/// captured prefix; anything past it is stale and must not be played.
pub struct ClipBuffer<'a> {
    data: &'a mut [u8],
    captured: usize,
}

impl<'a> ClipBuffer<'a> {
    /// Wrap a pre-allocated byte region. The clip starts empty.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, captured: 0 }
    }

    /// Total capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes of valid audio from the last recording.
    #[inline]
    pub fn captured(&self) -> usize {
        self.captured
    }

    /// Check if the clip holds no audio.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.captured == 0
    }

    /// Record the number of bytes the last transfer actually filled.
    ///
    /// Clamped to capacity; the driver can never have written past the
    /// slice it was given.
    #[inline]
    pub fn set_captured(&mut self, bytes: usize) {
        self.captured = bytes.min(self.data.len());
    }

    /// Full-capacity destination slice for recording.
    #[inline]
    pub fn record_target(&mut self) -> &mut [u8] {
        self.data
    }

    /// The valid audio bytes for playback.
    #[inline]
    pub fn audio(&self) -> &[u8] {
        &self.data[..self.captured]
    }

    /// Discard the recorded audio without touching the bytes.
    #[inline]
    pub fn clear(&mut self) {
        self.captured = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clip_is_empty() {
        let mut backing = [0u8; 64];
        let clip = ClipBuffer::new(&mut backing);
        assert_eq!(clip.capacity(), 64);
        assert_eq!(clip.captured(), 0);
        assert!(clip.is_empty());
        assert!(clip.audio().is_empty());
    }

    #[test]
    fn test_captured_tracks_transfer() {
        let mut backing = [0u8; 64];
        let mut clip = ClipBuffer::new(&mut backing);

        clip.record_target()[..4].copy_from_slice(&[1, 2, 3, 4]);
        clip.set_captured(4);

        assert_eq!(clip.captured(), 4);
        assert_eq!(clip.audio(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_captured_clamps_to_capacity() {
        let mut backing = [0u8; 8];
        let mut clip = ClipBuffer::new(&mut backing);

        clip.set_captured(1000);
        assert_eq!(clip.captured(), 8);
    }

    #[test]
    fn test_clear_discards_audio() {
        let mut backing = [0u8; 8];
        let mut clip = ClipBuffer::new(&mut backing);

        clip.set_captured(8);
        clip.clear();

        assert!(clip.is_empty());
        assert!(clip.audio().is_empty());
    }
}
