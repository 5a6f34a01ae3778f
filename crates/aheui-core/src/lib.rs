//! Aheui Runtime - Core Library
//!
//! Public API surface for the storage runtime, the program loader and the
//! driver that executes loaded programs.

pub mod error;
pub mod config;
pub mod encoding;
pub mod bytecode;
pub mod vm;
pub mod loader;

// Re-export commonly used types
pub use error::{AheuiError, AheuiResult};
pub use config::AheuiConfig;
pub use bytecode::{Instruction, OpCode, Program};
pub use vm::{Exit, Machine, Runtime, Storage, Value};
pub use loader::{ProgramLoader, ProgramWriter, SourceKind};

#[cfg(test)]
mod tests {
	use super::*;

	fn machine(asm: &str, input: &'static str) -> Machine<&'static [u8], Vec<u8>> {
		let program = ProgramLoader::load_asm(asm).expect("load failed");
		let runtime = Runtime::new(input.as_bytes(), Vec::new());
		Machine::new(AheuiConfig::new(), program, runtime)
	}

	#[test]
	fn halt_reports_top_as_exit_code() {
		let mut m = machine("PUSH 2\nPUSH 5\nHALT\n", "");
		let exit = m.run().expect("execution failed");
		assert_eq!(exit, Exit { code: 5 });
		assert_eq!(m.runtime().exit_code(), 5);
	}

	#[test]
	fn running_off_the_end_halts() {
		let mut m = machine("PUSH 7\n", "");
		assert_eq!(m.run().expect("execution failed").code, 7);
	}

	#[test]
	fn countdown_loop_prints_digits() {
		// prints 3, 2, 1 then exits with 0
		let asm = "\
			PUSH 3\n\
			loop: DUP\n\
			BRZ done\n\
			DUP\n\
			POPNUM\n\
			PUSH 1\n\
			SUB\n\
			JMP loop\n\
			done: POP\n\
			HALT\n";
		let mut m = machine(asm, "");
		let exit = m.run().expect("execution failed");
		assert_eq!(exit.code, 0);
		assert_eq!(m.into_runtime().into_output(), b"321");
	}

	#[test]
	fn brpop_jumps_on_short_storage() {
		let asm = "\
			PUSH 1\n\
			BRPOP2 short\n\
			PUSH 9\n\
			HALT\n\
			short: PUSH 4\n\
			HALT\n";
		let mut m = machine(asm, "");
		assert_eq!(m.run().expect("execution failed").code, 4);
	}

	#[test]
	fn echo_sum_of_two_inputs() {
		let mut m = machine("PUSHNUM\nPUSHNUM\nADD\nPOPNUM\nHALT\n", "40 2\n");
		m.run().expect("execution failed");
		assert_eq!(m.into_runtime().into_output(), b"42");
	}

	#[test]
	fn out_of_range_character_ends_program() {
		let asm = "PUSH 72\nPOPCHAR\nPUSH -3\nPOPCHAR\nPUSH 73\nPOPCHAR\n";
		let mut m = machine(asm, "");
		assert_eq!(m.run().expect("execution failed").code, -3);
		assert_eq!(m.into_runtime().into_output(), b"H");
	}

	#[test]
	fn faults_surface_as_errors() {
		assert!(matches!(
			machine("PUSH 1\nPUSH 0\nDIV\n", "").run(),
			Err(AheuiError::DivisionByZero)
		));
		assert!(matches!(
			machine("ADD\n", "").run(),
			Err(AheuiError::StorageUnderflow { op: "add", .. })
		));
		assert!(matches!(
			machine("PUSHNUM\n", "abc").run(),
			Err(AheuiError::InputParse(_))
		));
	}

	#[test]
	fn step_limit_stops_infinite_loop() {
		let program = ProgramLoader::load_asm("top: JMP top\n").expect("load failed");
		let runtime = Runtime::new(&b""[..], Vec::new());
		let mut m = Machine::new(AheuiConfig::new().with_step_limit(100), program, runtime);
		assert!(matches!(m.run(), Err(AheuiError::StepLimitExceeded(100))));
		assert_eq!(m.steps(), 100);
	}

	#[test]
	fn queue_space_selected_by_program() {
		// queue pops oldest: exit code is the first value pushed
		let asm = "SEL 21\nPUSH 1\nPUSH 2\nPUSH 3\nHALT\n";
		assert_eq!(machine(asm, "").run().expect("execution failed").code, 1);
	}
}
