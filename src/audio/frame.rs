//! Frequency-magnitude snapshot shared between capture and the visual core.

/// Unsigned 8-bit magnitude per frequency bin, lowest frequency first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioFrame {
    bins: Vec<u8>,
}

impl AudioFrame {
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Mean magnitude in [0, 255]
    pub fn mean(&self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.bins.iter().map(|&b| b as u64).sum();
        sum as f32 / self.bins.len() as f32
    }

    /// Index of the loudest bin (first one on ties)
    pub fn peak_index(&self) -> usize {
        let mut best = 0;
        let mut best_value = 0u8;
        for (i, &value) in self.bins.iter().enumerate() {
            if value > best_value {
                best_value = value;
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_peak() {
        let frame = AudioFrame::new(vec![0, 10, 200, 200, 30]);
        assert!((frame.mean() - 88.0).abs() < 1e-4);
        assert_eq!(frame.peak_index(), 2);
    }

    #[test]
    fn test_silent_frame_peaks_at_zero() {
        let frame = AudioFrame::new(vec![0; 128]);
        assert_eq!(frame.peak_index(), 0);
        assert_eq!(frame.mean(), 0.0);
        assert!(AudioFrame::default().is_empty());
    }
}
