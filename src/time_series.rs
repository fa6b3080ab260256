/// Net WPM observed `secs` seconds into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub secs: f64,
    pub wpm: f64,
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (s.secs, s.wpm)
    }
}

/// At most one sample per whole elapsed second, plus a final sample at finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmSeries {
    samples: Vec<WpmSample>,
}

impl WpmSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `wpm` at `secs` if a new whole second has been reached since
    /// the last sample. Returns whether the sample was kept.
    pub fn record_whole_second(&mut self, secs: f64, wpm: f64) -> bool {
        let whole = secs.floor();
        if whole < 1.0 {
            return false;
        }
        if self.samples.last().is_some_and(|s| s.secs >= whole) {
            return false;
        }
        self.samples.push(WpmSample { secs: whole, wpm });
        true
    }

    /// Record the closing sample, replacing one taken at the same instant.
    pub fn record_final(&mut self, secs: f64, wpm: f64) {
        if let Some(last) = self.samples.last_mut() {
            if last.secs >= secs {
                last.wpm = wpm;
                return;
            }
        }
        self.samples.push(WpmSample { secs, wpm });
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.wpm).fold(0.0, f64::max)
    }

    pub fn as_tuples(&self) -> Vec<(f64, f64)> {
        self.samples.iter().copied().map(Into::into).collect()
    }
}
