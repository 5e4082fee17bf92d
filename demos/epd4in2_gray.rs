#![deny(warnings)]

use std::{error::Error, thread, time::Duration};

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Gray8,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::Text,
};
use epd4in2_gray::{
    epd4in2_gray::{Display4in2Gray, HEIGHT, WIDTH},
    linux::{self, LinuxConfig},
    prelude::*,
};

const REFRESH: Duration = Duration::from_secs(15 * 60);
const RETRY: Duration = Duration::from_secs(5 * 60);

// The pins are the ones of the Waveshare e-Paper HAT plus a status LED on BCM 27.
// activate spi, gpio in raspi-config
// needs to be run with sudo because of some sysfs_gpio permission problems

/// Four bands, one per shade, and a refresh counter
struct TestCard {
    display: Box<Display4in2Gray>,
    refreshes: u32,
}

impl TestCard {
    fn new() -> Self {
        Self {
            display: Box::default(),
            refreshes: 0,
        }
    }
}

impl Renderer for TestCard {
    type Error = core::convert::Infallible;

    fn render(&mut self, canvas: &mut [u8]) -> Result<(), Self::Error> {
        self.refreshes += 1;
        let display = &mut *self.display;
        display.fill(Shade::White);

        let band = WIDTH / 4;
        for (i, shade) in Shade::ALL.iter().enumerate() {
            Rectangle::new(Point::new((band * i as u32) as i32, 60), Size::new(band, HEIGHT - 60))
                .into_styled(PrimitiveStyle::with_fill(Gray8::from(*shade)))
                .draw(display)?;
        }

        Circle::with_center(Point::new(WIDTH as i32 / 2, 180), 120)
            .into_styled(PrimitiveStyle::with_stroke(Gray8::from(Shade::White), 4))
            .draw(display)?;

        let style = MonoTextStyle::new(&FONT_10X20, Gray8::from(Shade::Black));
        let title = format!("four shades, refresh #{}", self.refreshes);
        Text::new(&title, Point::new(10, 30), style).draw(display)?;

        canvas.copy_from_slice(display.buffer());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut epd = linux::open(&LinuxConfig::default())?;

    epd.wake_up()?;
    epd.clear_frame()?;
    epd.sleep()?;

    let mut canvas = vec![0u8; (WIDTH * HEIGHT) as usize];
    let mut dashboard = Dashboard::new(epd, TestCard::new(), &mut canvas);

    loop {
        let pause = match dashboard.update() {
            Ok(()) => REFRESH,
            Err(err) => {
                log::error!("{err}, retrying in {} s", RETRY.as_secs());
                RETRY
            }
        };
        thread::sleep(pause);
    }
}
