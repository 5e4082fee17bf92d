#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Driver configuration
pub struct Config {
    /// Delay between two polls of the busy line, also applied once before the
    /// first poll and once after the panel reports ready.
    pub settle_delay_ms: u32,
    /// Length of each of the three steps of the hardware reset pulse
    pub reset_delay_ms: u32,
    /// Upper bound for a single busy wait.
    ///
    /// `None` waits forever, which hangs the caller if the panel never answers.
    pub busy_timeout_ms: Option<u32>,
    /// Which columns are grouped when packing a row into 2-bit codes
    pub sampling: Sampling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            reset_delay_ms: 200,
            busy_timeout_ms: Some(30_000),
            sampling: Sampling::Aligned,
        }
    }
}

impl Config {
    /// Returns the configuration with a different busy wait budget
    pub fn with_busy_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Returns the configuration with a different sampling window
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Column window used when four pixels are packed into one byte
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Sampling {
    /// The group starting at column `x` holds columns `x..x + 4`
    #[default]
    Aligned,
    /// The group starting at column `x` holds columns `x - 3..=x`.
    ///
    /// For the first group of a row the negative columns wrap around to the
    /// last three pixels of the same row. This shifts the picture three pixels
    /// to the right and matches the byte stream of the first Raspberry Pi
    /// dashboards built for this panel.
    Legacy,
}
