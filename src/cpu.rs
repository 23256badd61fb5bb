// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod alu;
pub mod behavior;
pub mod flags;
pub mod frequency;
pub mod instruction;
pub mod state;
pub mod throttle;

pub use self::{
    flags::Flags,
    frequency::Frequency,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn, HALT,
    },
    state::State,
};
use self::throttle::Throttle;
use crate::{
    bus::Bus,
    error::{Error, Result},
    screen::PixelSink,
};
use owo_colors::OwoColorize;
use std::time::Instant;

type Reg = usize;

/// The number of general purpose registers
pub const REGISTERS: usize = 8;
/// The stack pointer, by convention
pub const SP: Reg = 6;
/// The link register, written by `jal`
pub const LINK: Reg = 7;
/// The initial value of the stack pointer: the top of RAM
pub const STACK_TOP: i16 = 0x3fff;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU runs, but which aren't inherent to the
    /// architecture. Includes the target [Frequency], debug mode, etc.
    pub flags: Flags,
    state: State,
    // registers
    pc: u16,
    r: [i16; REGISTERS],
    // Execution data
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    throttle: Throttle,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU, taking all configurable parameters
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let cpu = CPU::new(
    ///     Dis::default(),
    ///     Flags {
    ///         frequency: Frequency(1024),
    ///         ..Default::default()
    ///     },
    /// );
    /// assert_eq!(cpu.flags.frequency, Frequency(1024));
    /// assert_eq!(cpu.state(), State::Idle);
    /// ```
    pub fn new(disassembler: Dis, flags: Flags) -> Self {
        CPU {
            disassembler,
            flags,
            ..Default::default()
        }
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// // Create a new CPU, and set R4 to -41
    /// let mut cpu = CPU::default();
    /// cpu.set_reg(4, -41).unwrap();
    /// assert_eq!(cpu.reg(4), Some(-41));
    /// cpu.set_reg(8, 0).expect_err("There are only 8 registers");
    /// ```
    pub fn set_reg(&mut self, reg: Reg, value: i16) -> Result<()> {
        if let Some(gpr) = self.r.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a general purpose register, if it exists
    pub fn reg(&self, reg: Reg) -> Option<i16> {
        self.r.get(reg).copied()
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let cpu = CPU::default();
    /// assert_eq!(cpu.regs(), [0, 0, 0, 0, 0, 0, 0x3fff, 0]);
    /// ```
    pub fn regs(&self) -> &[i16] {
        self.r.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0, cpu.pc());
    /// ```
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Gets the number of instructions the CPU has retired
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the run [State]
    pub fn state(&self) -> State {
        self.state
    }

    /// Starts (or resumes) running on the next [tick](CPU::tick).
    ///
    /// The first tick after starting only records the time.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.start();
    /// assert!(cpu.state().is_running());
    /// ```
    pub fn start(&mut self) {
        self.state = State::Running;
        self.throttle.restart();
    }

    /// Stops running. Halted and faulted CPUs stay that way.
    pub fn stop(&mut self) {
        if self.state.is_running() {
            self.state = State::Idle;
        }
    }

    /// Resets the CPU.
    ///
    /// Zeroes the registers (except the stack pointer, which returns to the top of RAM),
    /// the program counter, and the cycle count, and stops running.
    ///
    /// Does not touch [Flags], or any memory on the [Bus].
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_reg(6, 0).unwrap();
    /// cpu.start();
    /// cpu.reset();
    /// assert_eq!(cpu.regs()[6], 0x3fff);
    /// assert_eq!(cpu.state(), State::Idle);
    /// ```
    pub fn reset(&mut self) {
        self.r = [0; REGISTERS];
        self.r[SP] = STACK_TOP;
        self.pc = 0;
        self.cycle = 0;
        self.state = State::Idle;
        self.throttle.restart();
    }

    /// Executes exactly one instruction, whatever the run state.
    ///
    /// The halt sentinel is still honored. Does not touch the tick timer.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut cpu = CPU::default();
    /// let mut bus = bus! {
    ///     Rom = &[
    ///         0x5045, // addi R1, R0, 5
    ///         0x0000, // halt
    ///     ],
    /// };
    /// assert_eq!(cpu.singlestep(&mut bus, &mut ()).unwrap(), State::Idle);
    /// assert_eq!(cpu.regs()[1], 5);
    /// assert_eq!(cpu.singlestep(&mut bus, &mut ()).unwrap(), State::Halted);
    /// assert_eq!(1, cpu.pc());
    /// ```
    pub fn singlestep(&mut self, bus: &mut Bus, sink: &mut impl PixelSink) -> Result<State> {
        self.retire(bus, sink)?;
        Ok(self.state)
    }

    /// Executes up to `steps` instructions, stopping early on halt.
    ///
    /// Returns the number of instructions retired.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut cpu = CPU::default();
    /// let mut bus = bus! {
    ///     Rom = &[
    ///         0x5241, // addi R1, R1, 1
    ///         0x4000, // j 0
    ///     ],
    /// };
    /// assert_eq!(cpu.multistep(&mut bus, 0x20, &mut ()).unwrap(), 0x20);
    /// assert_eq!(cpu.regs()[1], 0x10);
    /// ```
    pub fn multistep(
        &mut self,
        bus: &mut Bus,
        steps: usize,
        sink: &mut impl PixelSink,
    ) -> Result<usize> {
        for retired in 0..steps {
            if !self.retire(bus, sink)? {
                return Ok(retired);
            }
        }
        Ok(steps)
    }

    /// Runs the instructions due at `now`, if running.
    ///
    /// The budget comes from the [Throttle] and [Flags::frequency],
    /// unless [Flags::monotonic] overrides it.
    ///
    /// Returns the number of instructions retired.
    /// Returns [Error::InvalidOpcode] or [Error::InvalidAluFunction] if an instruction
    /// can't be executed; the CPU is then [State::Faulted].
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// # use std::time::{Duration, Instant};
    /// let mut cpu = CPU::default();
    /// let mut bus = bus! { Rom = &[0x5045, 0x5083, 0x029a, 0x20c0] };
    /// let start = Instant::now();
    /// cpu.start();
    /// // The first tick only starts the clock
    /// assert_eq!(cpu.tick(&mut bus, start, &mut ()).unwrap(), 0);
    /// // 8192 Hz, for 1 second, until the halt after the program
    /// let now = start + Duration::from_secs(1);
    /// assert_eq!(cpu.tick(&mut bus, now, &mut ()).unwrap(), 4);
    /// assert_eq!(cpu.state(), State::Halted);
    /// assert_eq!(bus.ram()[0], 8);
    /// ```
    /// ```rust
    /// # use emu16::prelude::*;
    /// # use std::time::Instant;
    /// let mut cpu = CPU::default();
    /// cpu.flags.monotonic = Some(8);
    /// let mut bus = bus! { Rom = &[0x9000] };
    /// cpu.start();
    /// cpu.tick(&mut bus, Instant::now(), &mut ())
    ///     .expect_err("0x9000 is not an instruction");
    /// assert_eq!(cpu.state(), State::Faulted);
    /// ```
    pub fn tick(&mut self, bus: &mut Bus, now: Instant, sink: &mut impl PixelSink) -> Result<usize> {
        if !self.state.is_running() {
            return Ok(0);
        }
        let budget = match self.flags.monotonic {
            Some(budget) => budget,
            None => self.throttle.budget(now, self.flags.frequency),
        };
        self.multistep(bus, budget, sink)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0000, CYC:      0, Idle
    /// R0:      0 R1:      0 R2:      0 R3:      0
    /// R4:      0 R5:      0 R6:  16383 R7:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, CYC: {:6}, {}\n{}",
            self.pc,
            self.cycle,
            self.state,
            self.r
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "R{i}: {gpr:6}{}",
                        match i % 4 {
                            3 => "\n",
                            _ => " ",
                        }
                    )
                })
                .collect::<String>()
                .trim_end(),
        );
    }
}

// private implementation
impl CPU {
    /// Fetches, decodes, and executes the instruction at `pc`.
    ///
    /// Returns false, without executing anything, if the word at `pc` is the halt sentinel.
    fn retire(&mut self, bus: &mut Bus, sink: &mut impl PixelSink) -> Result<bool> {
        // fetch
        let Some(word) = bus.fetch(self.pc) else {
            return Err(self.fault(Error::ProgramCounterOutOfRange { pc: self.pc }));
        };
        if word == HALT {
            self.state = State::Halted;
            return Ok(false);
        }

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:6} {:04x}: {:<24} {}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(word),
                format_args!("{word:04x}").bright_black(),
            );
        }

        // decode
        let insn = match Insn::decode(word) {
            Ok(insn) => insn,
            Err(e) => return Err(self.fault(e)),
        };
        self.execute(bus, insn, sink);
        self.pc = self.pc.wrapping_add(1);
        self.cycle += 1;
        Ok(true)
    }

    /// Stops the CPU on an error, and passes the error along
    fn fault(&mut self, error: Error) -> Error {
        self.state = State::Faulted;
        error
    }
}

impl Default for CPU {
    /// Constructs a new, idle CPU
    ///
    /// | value | default  | description
    /// |-------|----------|------------
    /// | pc    | `0x0000` | Start of ROM
    /// | R6    | `0x3fff` | Stack pointer, at the top of RAM
    ///
    /// # Examples
    /// ```rust
    /// use emu16::prelude::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        let mut r = [0; REGISTERS];
        r[SP] = STACK_TOP;
        CPU {
            flags: Flags::default(),
            state: State::default(),
            pc: 0,
            r,
            cycle: 0,
            throttle: Throttle::default(),
            disassembler: Dis::default(),
        }
    }
}
