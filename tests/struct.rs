//! Testing methods on emu16's structs
use emu16::{
    cpu::{alu::Funct, Insn},
    error::Error,
    prelude::*,
};
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn emulator() {
    let emu = Emulator::default(); // Default
    let emu2 = emu.clone(); // Clone
    assert_eq!(emu, emu2); // PartialEq
    println!("{emu:?}"); // Debug
}

#[test]
fn error() {
    let error = Error::ImageTooLarge {
        region: Ram,
        len: 0x4001,
        capacity: 0x4000,
    };
    assert_eq!(
        error.to_string(),
        "image of 16385 words does not fit in RAM (16384 words)"
    );
    println!("{error} {error:?}");
}

mod bus {
    use super::*;
    mod region {
        use super::*;
        #[test]
        fn copy() {
            let r1 = Screen;
            let r2 = r1;
            assert_eq!(r1, r2);
        }
        #[test]
        fn display() {
            assert_eq!(format!("{Rom} {Ram} {Screen} {Keyboard}"), "ROM RAM Screen Keyboard");
        }
        #[test]
        fn debug() {
            println!("{Rom:?}{Ram:?}{Screen:?}{Keyboard:?}");
        }
        #[test]
        fn ord() {
            assert!(Rom < Ram && Ram < Screen && Screen < Keyboard);
        }
        #[test]
        fn hash() {
            let mut hasher = DefaultHasher::new();
            Rom.hash(&mut hasher);
            println!("{hasher:?}");
        }
        #[test]
        fn capacity() {
            assert_eq!(Rom.capacity(), 0x8000);
            assert_eq!(Ram.capacity(), 0x4000);
            assert_eq!(Screen.capacity(), 0x2000);
            assert_eq!(Keyboard.capacity(), 1);
        }
    }
    #[test]
    fn bus_macro() {
        let bus = bus! {
            Rom = &[0x5045],
            Ram = &[0xffff],
            Screen,
        };
        assert_eq!(bus.rom()[0], 0x5045);
        assert_eq!(bus.ram()[0], -1);
    }
    #[test]
    fn clone_debug() {
        let bus = bus! {};
        assert_eq!(bus, bus.clone());
        println!("{bus:?}");
    }
}

mod cpu {
    use super::*;

    #[test]
    fn clone() {
        let cpu = CPU::default();
        let cpu2 = cpu.clone();
        assert_eq!(cpu, cpu2);
    }
    #[test]
    fn debug() {
        println!("{:?}", CPU::default());
    }

    mod flags {
        use super::*;
        #[test]
        fn default() {
            let flags = Flags::default();
            assert!(!flags.debug);
            assert_eq!(flags.frequency, Frequency(8192));
            assert_eq!(flags.monotonic, None);
        }
        #[test]
        fn clone_ord_hash() {
            let f1 = Flags::default();
            let f2 = Flags {
                debug: true,
                ..f1.clone()
            };
            assert!(f1 < f2);
            let mut hasher = DefaultHasher::new();
            f2.hash(&mut hasher);
        }
    }

    mod frequency {
        use super::*;
        #[test]
        fn parse() {
            assert_eq!("8k".parse::<Frequency>().unwrap(), Frequency(8192));
            assert_eq!("128K".parse::<Frequency>().unwrap(), Frequency::MAX);
            assert_eq!("1000".parse::<Frequency>().unwrap(), Frequency(1000));
            "fast".parse::<Frequency>().unwrap_err();
        }
        #[test]
        fn display() {
            assert_eq!(Frequency(8192).to_string(), "8k");
            assert_eq!(Frequency(512).to_string(), "512");
        }
        #[test]
        fn display_round_trips_standard_rates() {
            for rate in Frequency::standard() {
                assert_eq!(rate.to_string().parse::<Frequency>().unwrap(), rate);
            }
        }
    }

    mod state {
        use super::*;
        #[test]
        fn default() {
            assert_eq!(State::default(), State::Idle);
        }
        #[test]
        fn display() {
            assert_eq!(State::Faulted.to_string(), "Faulted");
        }
        #[test]
        fn running() {
            assert!(State::Running.is_running());
            assert!(!State::Halted.is_running());
        }
    }

    mod insn {
        use super::*;
        #[test]
        fn try_from() {
            assert_eq!(
                Insn::try_from(0x029a_u16).unwrap(),
                Insn::alu {
                    f: Funct::Add,
                    d: 3,
                    s: 1,
                    t: 2
                }
            );
            Insn::try_from(0xe000_u16).unwrap_err();
        }
        #[test]
        fn display() {
            assert_eq!(Insn::jr { s: 7 }.to_string(), "jr R7");
        }
    }

    mod dis {
        use super::*;
        #[test]
        fn default() {
            let dis = Dis::default();
            assert!(dis.once(0x5045).contains("addi R1, R0, 5"));
            assert!(dis.once(0x9000).contains("Invalid op: 9"));
        }
        #[test]
        fn clone_debug() {
            let dis = Dis::default();
            assert_eq!(dis, dis.clone());
            println!("{dis:?}");
        }
    }
}

mod screen {
    use super::*;
    #[test]
    fn pixel_default() {
        assert_eq!(
            Pixel::default(),
            Pixel {
                x: 0,
                y: 0,
                r: 0,
                g: 0,
                b: 0
            }
        );
    }
    #[test]
    fn framebuffer() {
        let mut fb = FrameBuffer::default();
        fb.paint(Pixel::new(0x81, 0xf800));
        assert_eq!(fb.buffer()[0x81], 0x00f80000);
        assert_eq!(fb.buffer().len(), 128 * 64);
    }
}
