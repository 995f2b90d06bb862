//! Viewport size tracking with resize notifications.
//!
//! Layout never depends on the viewport: render-space units are packing
//! units, not pixels.

use glam::{Vec2, Vec3};
use tokio::sync::broadcast;
use tracing::debug;

/// Device pixel ratios above this are clamped
pub const MAX_PIXEL_RATIO: f32 = 2.0;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Resized { width: u32, height: u32 },
}

#[derive(Debug)]
pub struct Viewport {
    width: u32,
    height: u32,
    device_pixel_ratio: f32,
    events: broadcast::Sender<ViewportEvent>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio: 1.0,
            events,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Effective pixel ratio, capped at [`MAX_PIXEL_RATIO`]. Ratios that
    /// are not positive count as 1.
    pub fn pixel_ratio(&self) -> f32 {
        let ratio = self.device_pixel_ratio;
        if ratio.is_finite() && ratio > 0.0 {
            ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    /// Output surface size in device pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width as f32 * ratio).round() as u32).max(1),
            ((self.height as f32 * ratio).round() as u32).max(1),
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewportEvent> {
        self.events.subscribe()
    }

    /// Resize and notify subscribers. Zero sizes are raised to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        debug!(width, height, "viewport resized");
        // No subscribers is fine
        let _ = self.events.send(ViewportEvent::Resized { width, height });
    }

    /// Map normalized device coordinates to pixels, origin top-left
    pub fn ndc_to_pixel(&self, ndc: Vec3) -> Vec2 {
        let (w, h) = self.drawing_buffer_size();
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * w as f32,
            (1.0 - ndc.y) * 0.5 * h as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_clamped() {
        let vp = Viewport::new(800, 600).with_device_pixel_ratio(3.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.drawing_buffer_size(), (1600, 1200));
    }

    #[test]
    fn test_low_pixel_ratio_is_kept() {
        let vp = Viewport::new(800, 600).with_device_pixel_ratio(0.5);
        assert_eq!(vp.pixel_ratio(), 0.5);
        assert_eq!(vp.drawing_buffer_size(), (400, 300));

        let vp = Viewport::new(800, 600).with_device_pixel_ratio(0.0);
        assert_eq!(vp.pixel_ratio(), 1.0);
        let vp = Viewport::new(800, 600).with_device_pixel_ratio(f32::NAN);
        assert_eq!(vp.pixel_ratio(), 1.0);
    }

    #[test]
    fn test_resize_notifies_subscribers() {
        let mut vp = Viewport::new(800, 600);
        let mut rx = vp.subscribe();
        vp.resize(1024, 768);
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewportEvent::Resized {
                width: 1024,
                height: 768
            }
        );
        // Same size again is not an event
        vp.resize(1024, 768);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_ndc_corners() {
        let vp = Viewport::new(200, 100);
        assert_eq!(vp.ndc_to_pixel(Vec3::new(-1.0, 1.0, 0.0)), Vec2::new(0.0, 0.0));
        assert_eq!(vp.ndc_to_pixel(Vec3::new(1.0, -1.0, 0.0)), Vec2::new(200.0, 100.0));
        assert_eq!(vp.ndc_to_pixel(Vec3::ZERO), Vec2::new(100.0, 50.0));
    }
}
