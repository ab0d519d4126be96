//! Full example code for bringing up an SSD1306 display and drawing a checkerboard. This runs on
//! an STM32F103, with the 128x64 module on SPI1 (PA5 SCK, PA6 MISO, PA7 MOSI), PA4 for C/S, PA1
//! for D/C and PA0 for /RESET.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

use cortex_m::asm;
use cortex_m_rt::entry;
use panic_halt as _;
use ssd1306_link as oled;
use stm32f1xx_hal::{pac, prelude::*, spi::Spi};

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut afio = dp.AFIO.constrain();
    let mut gpioa = dp.GPIOA.split();

    // SPI1 in mode 3, at PCLK2 / 256 like the board this was first brought up on.
    let bus_cfg = oled::BusConfig::default();
    let sck = gpioa.pa5.into_alternate_push_pull(&mut gpioa.crl);
    let miso = gpioa.pa6;
    let mosi = gpioa.pa7.into_alternate_push_pull(&mut gpioa.crl);
    let spi = Spi::spi1(
        dp.SPI1,
        (sck, miso, mosi),
        &mut afio.mapr,
        bus_cfg.mode,
        bus_cfg.bit_rate(clocks.pclk2().raw()).Hz(),
        clocks,
    );

    // Control lines start high: deselected, data mode, out of reset.
    let mut cs = gpioa.pa4.into_push_pull_output(&mut gpioa.crl);
    let mut dc = gpioa.pa1.into_push_pull_output(&mut gpioa.crl);
    let mut rst = gpioa.pa0.into_push_pull_output(&mut gpioa.crl);
    cs.set_high();
    dc.set_high();
    rst.set_high();

    let delay = cp.SYST.delay(&clocks);
    let link = oled::SpiInterface::new(oled::FullDuplexBus::new(spi), cs, dc, rst, delay)
        .with_poll_budget(oled::PollBudget::Bounded(100_000));

    let mut disp = oled::DisplayDriver::new(link, oled::Config::new().transaction_retries(2));
    disp.initialize().unwrap();

    let mut frame: oled::FrameBuffer = [0; oled::consts::FRAME_SIZE];
    oled::pattern::checkerboard(&mut frame);
    disp.draw_frame(&frame).unwrap();

    loop {
        asm::wfi();
    }
}
