//! One refresh of a dashboard: wake the panel, render, show, put it back to sleep.
//!
//! Scheduling is left to the caller, [`Dashboard::update`] is the unit it runs
//! every period.

use core::fmt::{Debug, Display, Formatter};

use crate::traits::{GrayscaleDisplay, PanelState};

/// Something that paints a full frame
pub trait Renderer {
    /// Error of a failed render
    type Error: Debug;

    /// Fills `canvas` with an 8-bit grayscale frame, one byte per pixel, row major
    fn render(&mut self, canvas: &mut [u8]) -> Result<(), Self::Error>;
}

/// Why an update didn't make it to the panel
#[derive(Debug)]
pub enum UpdateError<D, R> {
    /// The panel (or its wiring) failed
    Display(D),
    /// The renderer failed, the panel was put back to sleep untouched
    Render(R),
}

impl<D: Debug, R: Debug> Display for UpdateError<D, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Display(err) => write!(f, "display failed: {err:?}"),
            Self::Render(err) => write!(f, "rendering failed: {err:?}"),
        }
    }
}

impl<D: Debug, R: Debug> core::error::Error for UpdateError<D, R> {}

/// A panel, a renderer and the canvas passed between them
pub struct Dashboard<'a, EPD, R> {
    epd: EPD,
    renderer: R,
    canvas: &'a mut [u8],
}

impl<'a, EPD, R> Dashboard<'a, EPD, R>
where
    EPD: GrayscaleDisplay,
    R: Renderer,
{
    /// `canvas` must hold a full frame of the panel
    pub fn new(epd: EPD, renderer: R, canvas: &'a mut [u8]) -> Self {
        Dashboard {
            epd,
            renderer,
            canvas,
        }
    }

    /// Runs one refresh.
    ///
    /// Sleep is attempted whenever the panel is still awake afterwards, also
    /// when rendering or displaying failed. The first error wins.
    pub fn update(&mut self) -> Result<(), UpdateError<EPD::Error, R::Error>> {
        log::info!("Updating dashboard");
        self.epd.wake_up().map_err(UpdateError::Display)?;

        let shown = match self.renderer.render(&mut *self.canvas) {
            Ok(()) => self
                .epd
                .display_frame(&*self.canvas)
                .map_err(UpdateError::Display),
            Err(err) => Err(UpdateError::Render(err)),
        };

        let slept = if self.epd.state() == PanelState::Awake {
            self.epd.sleep().map_err(UpdateError::Display)
        } else {
            Ok(())
        };

        match &shown {
            Ok(()) => log::info!("Dashboard updated"),
            Err(err) => log::error!("Dashboard update failed: {err}"),
        }
        shown.and(slept)
    }

    /// The panel driver
    pub fn epd(&self) -> &EPD {
        &self.epd
    }

    /// Gives back the driver and the renderer
    pub fn release(self) -> (EPD, R) {
        (self.epd, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::color::Shade;
    use crate::config::Config;
    use crate::epd4in2_gray::FRAME_LEN;
    use crate::error::ErrorKind;
    use crate::testing::fake_epd;
    use std::vec;

    struct Solid(Shade);

    impl Renderer for Solid {
        type Error = ();

        fn render(&mut self, canvas: &mut [u8]) -> Result<(), ()> {
            canvas.fill(self.0.gray_value());
            Ok(())
        }
    }

    struct Broken;

    impl Renderer for Broken {
        type Error = &'static str;

        fn render(&mut self, _canvas: &mut [u8]) -> Result<(), &'static str> {
            Err("no forecast")
        }
    }

    #[test]
    fn update_runs_a_full_power_cycle() {
        let (epd, wire) = fake_epd(Config::default());
        let mut canvas = vec![0u8; FRAME_LEN];
        let mut dashboard = Dashboard::new(epd, Solid(Shade::Black), &mut canvas);

        dashboard.update().unwrap();
        assert_eq!(dashboard.epd().state(), PanelState::Asleep);

        let opcodes = wire.opcodes();
        assert_eq!(opcodes[0], 0x01);
        assert_eq!(&opcodes[opcodes.len() - 5..], &[0x10, 0x13, 0x12, 0x02, 0x07]);

        let sends = wire.sends();
        let plane_a = &sends[sends.len() - 5].1;
        assert!(plane_a.iter().all(|&byte| byte == 0x00));

        // the next period starts over from deep sleep
        wire.forget();
        dashboard.update().unwrap();
        assert_eq!(wire.opcodes(), opcodes);
    }

    #[test]
    fn failed_render_still_sleeps() {
        let (epd, wire) = fake_epd(Config::default());
        let mut canvas = vec![0u8; FRAME_LEN];
        let mut dashboard = Dashboard::new(epd, Broken, &mut canvas);

        let err = dashboard.update().unwrap_err();
        assert!(matches!(err, UpdateError::Render("no forecast")));
        assert_eq!(dashboard.epd().state(), PanelState::Asleep);

        let opcodes = wire.opcodes();
        assert!(!opcodes.contains(&0x10));
        assert_eq!(&opcodes[opcodes.len() - 2..], &[0x02, 0x07]);
    }

    #[test]
    fn short_canvas_is_reported_and_panel_sleeps() {
        let (epd, _wire) = fake_epd(Config::default());
        let mut canvas = vec![0u8; 10];
        let mut dashboard = Dashboard::new(epd, Solid(Shade::White), &mut canvas);

        let err = dashboard.update().unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Display(ErrorKind::InvalidBufferSize {
                expected: FRAME_LEN,
                actual: 10
            })
        ));
        assert_eq!(dashboard.epd().state(), PanelState::Asleep);
    }

    #[test]
    fn unresponsive_panel_is_left_uninitialized() {
        let (epd, wire) = fake_epd(Config::default().with_busy_timeout(Some(100)));
        wire.set_stuck_busy(true);
        let mut canvas = vec![0u8; FRAME_LEN];
        let mut dashboard = Dashboard::new(epd, Solid(Shade::White), &mut canvas);

        let err = dashboard.update().unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Display(ErrorKind::DeviceUnresponsive { .. })
        ));
        assert_eq!(dashboard.epd().state(), PanelState::Uninitialized);
    }
}
