//! Testing emu16's public API end to end
use emu16::{error::Error, image::parse_image, prelude::*};
use std::time::{Duration, Instant};

/// addi R1, R0, 5; addi R2, R0, 3; add R3, R1, R2; sw R3, 0(R0); halt
const SUM: [u16; 5] = [0x5045, 0x5083, 0x029a, 0x20c0, 0x0000];

fn emulator(rom: &[u16]) -> Emulator {
    let mut emu = Emulator::default();
    emu.load(Rom, rom).unwrap();
    emu
}

#[test]
fn sum_program() {
    let mut emu = emulator(&SUM);
    let start = Instant::now();
    emu.start();
    assert_eq!(emu.tick(start, &mut ()).unwrap(), 0);
    assert_eq!(emu.tick(start + Duration::from_secs(1), &mut ()).unwrap(), 4);
    assert_eq!(emu.bus.ram()[0], 8);
    assert_eq!(emu.state(), State::Halted);
    // halted engines don't run
    assert_eq!(emu.tick(start + Duration::from_secs(2), &mut ()).unwrap(), 0);
}

#[test]
fn sum_program_from_image() {
    let image = parse_image("v2.0 raw\n5045 5083 029a 20c0 0\n").unwrap();
    assert_eq!(image, SUM);
}

#[test]
fn half_second_at_default_rate() {
    let mut emu = emulator(&[0x4000]); // j 0
    let start = Instant::now();
    emu.start();
    emu.tick(start, &mut ()).unwrap();
    assert_eq!(emu.tick(start + Duration::from_millis(500), &mut ()).unwrap(), 4096);
    assert_eq!(emu.cpu.cycle(), 4096);
}

#[test]
fn short_ticks_accumulate() {
    let mut emu = emulator(&[0x4000]); // j 0
    let start = Instant::now();
    emu.start();
    emu.tick(start, &mut ()).unwrap();
    assert_eq!(emu.tick(start + Duration::from_micros(10), &mut ()).unwrap(), 0);
    assert_eq!(emu.tick(start + Duration::from_micros(130), &mut ()).unwrap(), 1);
}

#[test]
fn stopped_engine_doesnt_run() {
    let mut emu = emulator(&[0x4000]);
    let start = Instant::now();
    emu.start();
    emu.tick(start, &mut ()).unwrap();
    emu.stop();
    assert_eq!(emu.tick(start + Duration::from_secs(1), &mut ()).unwrap(), 0);
    assert_eq!(emu.state(), State::Idle);
}

#[test]
fn display() {
    // lw R2, 0(R0); addi R1, R0, -1; sw R1, 5(R2); display; halt
    let mut emu = emulator(&[0x1080, 0x507f, 0x2445, 0xf000, 0x0000]);
    emu.load(Ram, &[0x4000]).unwrap();
    let mut pixels: Vec<Pixel> = vec![];
    while emu.step(&mut pixels).unwrap() != State::Halted {}
    assert_eq!(
        pixels,
        [Pixel {
            x: 5,
            y: 0,
            r: 248,
            g: 252,
            b: 248
        }]
    );
    assert!(emu.bus.dirty().is_empty());
}

#[test]
fn keyboard() {
    // lw R2, 0(R0); lw R1, 0(R2); sw R0, 0(R2); halt
    let mut emu = emulator(&[0x1080, 0x1440, 0x2400, 0x0000]);
    emu.load(Ram, &[0x6000]).unwrap();
    emu.set_keyboard(38);
    emu.cpu.flags.monotonic = Some(8);
    emu.start();
    emu.tick(Instant::now(), &mut ()).unwrap();
    assert_eq!(emu.cpu.reg(1), Some(38));
    // the keyboard is read-only
    assert_eq!(emu.bus.keyboard(), 38);
}

#[test]
fn load_below_zero() {
    // addi R1, R0, 7; lw R1, -1(R0)
    let mut emu = emulator(&[0x5047, 0x107f]);
    emu.step(&mut ()).unwrap();
    assert_eq!(emu.cpu.reg(1), Some(7));
    emu.step(&mut ()).unwrap();
    assert_eq!(emu.cpu.reg(1), Some(0));
}

#[test]
fn reset() {
    let mut emu = emulator(&SUM);
    emu.bus.write(0x4000, 0x1234);
    emu.cpu.flags.monotonic = Some(16);
    emu.start();
    emu.tick(Instant::now(), &mut ()).unwrap();
    emu.reset();
    assert_eq!(emu.state(), State::Idle);
    assert_eq!(emu.cpu.pc(), 0);
    assert_eq!(emu.cpu.regs(), [0, 0, 0, 0, 0, 0, 0x3fff, 0]);
    assert!(emu.bus.ram().iter().all(|&word| word == 0));
    assert_eq!(&emu.bus.rom()[..5], SUM);
    assert_eq!(emu.bus.screen()[0], 0x1234);
}

#[test]
fn image_too_large() {
    let mut emu = emulator(&SUM);
    match emu.load(Rom, &vec![0xffff; 0x8001]) {
        Err(Error::ImageTooLarge {
            region: Rom,
            len: 0x8001,
            capacity: 0x8000,
        }) => {}
        other => panic!("{other:?}"),
    }
    assert_eq!(&emu.bus.rom()[..5], SUM);
    assert_eq!(emu.bus.rom()[5], 0);
}

#[test]
fn load_keeps_the_tail() {
    let mut emu = emulator(&SUM);
    emu.load(Rom, &[0xf000]).unwrap();
    assert_eq!(&emu.bus.rom()[..5], [0xf000, 0x5083, 0x029a, 0x20c0, 0x0000]);
}

#[test]
fn invalid_opcode_faults() {
    let mut emu = emulator(&[0x5045, 0x9000]);
    emu.cpu.flags.monotonic = Some(8);
    emu.start();
    match emu.tick(Instant::now(), &mut ()) {
        Err(Error::InvalidOpcode { word: 0x9000 }) => {}
        other => panic!("{other:?}"),
    }
    assert_eq!(emu.state(), State::Faulted);
    assert_eq!(emu.cpu.reg(1), Some(5));
    assert_eq!(emu.cpu.pc(), 1);
}

#[test]
fn invalid_funct_faults() {
    let mut emu = emulator(&[0x0003]);
    match emu.step(&mut ()) {
        Err(Error::InvalidAluFunction { funct: 3 }) => {}
        other => panic!("{other:?}"),
    }
    assert_eq!(emu.state(), State::Faulted);
}

#[test]
fn pc_out_of_range() {
    let mut emu = emulator(&[0x7200]); // jr R1
    emu.set_reg(1, 0x7fff).unwrap();
    assert_eq!(emu.step(&mut ()).unwrap(), State::Idle);
    assert_eq!(emu.cpu.pc(), 0x8000);
    match emu.step(&mut ()) {
        Err(Error::ProgramCounterOutOfRange { pc: 0x8000 }) => {}
        other => panic!("{other:?}"),
    }
    assert_eq!(emu.state(), State::Faulted);
}

mod revision {
    use super::*;

    #[test]
    fn every_edit_counts() {
        let mut emu = Emulator::default();
        let mut last = emu.revision();
        let mut changed = |emu: &Emulator| {
            let changed = emu.revision() != last;
            last = emu.revision();
            changed
        };
        emu.load(Rom, &SUM).unwrap();
        assert!(changed(&emu));
        emu.set_cell(Ram, 0, 1).unwrap();
        assert!(changed(&emu));
        assert!(emu.edit_cell(Rom, 0, "5045"));
        assert!(changed(&emu));
        emu.set_keyboard(10);
        assert!(changed(&emu));
        emu.set_frequency(Frequency(1));
        assert!(changed(&emu));
        emu.set_reg(3, 3).unwrap();
        assert!(changed(&emu));
        emu.start();
        assert!(changed(&emu));
        emu.stop();
        assert!(changed(&emu));
        emu.step(&mut ()).unwrap();
        assert!(changed(&emu));
        emu.reset();
        assert!(changed(&emu));
    }

    #[test]
    fn failures_dont_count() {
        let mut emu = Emulator::default();
        let revision = emu.revision();
        emu.load(Ram, &vec![0; 0x4001]).unwrap_err();
        emu.set_cell(Keyboard, 0, 1).unwrap_err();
        assert!(!emu.edit_cell(Ram, 0, "NaN"));
        assert!(!emu.edit_cell(Ram, 0x4000, "1"));
        emu.set_keyboard(0);
        assert_eq!(emu.revision(), revision);
    }

    #[test]
    fn idle_ticks_dont_count() {
        let mut emu = Emulator::default();
        let revision = emu.revision();
        emu.tick(Instant::now(), &mut ()).unwrap();
        assert_eq!(emu.revision(), revision);
    }
}

#[test]
fn frequency_accepted_verbatim() {
    let mut emu = Emulator::default();
    emu.set_frequency(Frequency(1000));
    assert_eq!(emu.frequency(), Frequency(1000));
    assert!(!emu.frequency().is_standard());
}
