//! Byte-based progress over the compressed size of the archive being decoded.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Progress for one archive. A hidden no-op when progress is disabled.
pub struct DecodeProgress {
    pb: Option<ProgressBar>,
    last: u64,
}

impl DecodeProgress {
    pub fn new(enabled: bool, total_compressed: u64, label: &str) -> Self {
        let pb = enabled.then(|| {
            let pb = ProgressBar::new(total_compressed);
            pb.set_style(bytes_style());
            pb.set_message(label.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { pb, last: 0 }
    }

    /// Advance to `consumed` compressed bytes (monotonic).
    #[inline]
    pub fn update(&mut self, consumed: u64) {
        if consumed > self.last {
            if let Some(pb) = &self.pb {
                pb.inc(consumed - self.last);
            }
            self.last = consumed;
        }
    }

    pub fn finish(&self, rows: usize) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(format!("{rows} lines"));
        }
    }

    pub fn abandon(&self) {
        if let Some(pb) = &self.pb {
            pb.abandon_with_message("failed");
        }
    }
}
