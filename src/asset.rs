//! One-shot asset loading and resizing of already-rendered icons.
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::AssetError;

/// How long [`AssetGate::wait`] blocks when the caller has no preference.
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(5);

/// A decode running on a background thread that settles exactly once.
///
/// Waiting consumes the gate, so a result can never be observed twice.
pub struct AssetGate {
    rx: Receiver<Result<Pixmap, AssetError>>,
}

impl AssetGate {
    pub fn decode_png(bytes: Vec<u8>) -> Self {
        let (tx, rx) = mpsc::sync_channel(1);
        thread::spawn(move || {
            let result = Pixmap::decode_png(&bytes).map_err(AssetError::from);
            // The waiter may have timed out and gone away.
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// Block until the asset settles or `timeout` elapses.
    pub fn wait(self, timeout: Duration) -> Result<Pixmap, AssetError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(?timeout, "asset load timed out");
                Err(AssetError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(AssetError::Disconnected),
        }
    }
}

/// Resample a square icon to `size`×`size` with bicubic filtering.
pub fn resize_icon(source: &Pixmap, size: u32) -> Result<Pixmap, AssetError> {
    let mut target = Pixmap::new(size, size).ok_or(AssetError::Surface(size))?;
    let sx = size as f32 / source.width() as f32;
    let sy = size as f32 / source.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, source.as_ref(), &paint, Transform::from_scale(sx, sy), None);
    Ok(target)
}

pub fn generate_previews(
    source: &Pixmap,
    sizes: &[u32],
) -> Result<Vec<(u32, Pixmap)>, AssetError> {
    sizes
        .iter()
        .map(|&size| resize_icon(source, size).map(|pixmap| (size, pixmap)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let gate = AssetGate::decode_png(b"not a png".to_vec());
        assert!(matches!(
            gate.wait(DEFAULT_ASSET_TIMEOUT),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn unsettled_gate_times_out() {
        let (_tx, rx) = mpsc::sync_channel(1);
        let gate = AssetGate { rx };
        let timeout = Duration::from_millis(20);
        assert!(matches!(gate.wait(timeout), Err(AssetError::Timeout(t)) if t == timeout));
    }

    #[test]
    fn dropped_loader_reports_disconnect() {
        let (tx, rx) = mpsc::sync_channel::<Result<Pixmap, AssetError>>(1);
        drop(tx);
        let gate = AssetGate { rx };
        assert!(matches!(
            gate.wait(DEFAULT_ASSET_TIMEOUT),
            Err(AssetError::Disconnected)
        ));
    }

    #[test]
    fn resize_keeps_solid_color() {
        let mut source = Pixmap::new(64, 64).unwrap();
        source.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        let small = resize_icon(&source, 16).unwrap();
        assert_eq!(small.width(), 16);
        let px = small.pixel(8, 8).unwrap();
        assert_eq!((px.red(), px.alpha()), (255, 255));
    }

    #[test]
    fn resize_rejects_zero() {
        let source = Pixmap::new(8, 8).unwrap();
        assert!(matches!(resize_icon(&source, 0), Err(AssetError::Surface(0))));
    }
}
