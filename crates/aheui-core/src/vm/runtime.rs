//! Runtime
//!
//! Owns the space table, the current selection and the I/O streams, and
//! exposes every primitive a driver can issue. Program-authored termination
//! is returned as an [`Exit`] signal; the library never exits the process.

use std::fmt;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::encoding::encode;
use crate::error::{AheuiError, AheuiResult};
use super::spaces::Spaces;
use super::storage::Storage;
use super::value::{Value, MAX_CODEPOINT};

/// Termination requested by the running program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub code: Value,
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit {}", self.code)
    }
}

/// Storage runtime bound to an input reader and an output writer
#[derive(Debug)]
pub struct Runtime<R, W> {
    spaces: Spaces,
    selected: usize,
    exit_code: Value,
    terminated: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Runtime<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Runtime {
            spaces: Spaces::new(),
            selected: 0,
            exit_code: 0,
            terminated: false,
            input,
            output,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn space(&self, index: usize) -> AheuiResult<&Storage> {
        self.spaces.get(index)
    }

    pub fn exit_code(&self) -> Value {
        self.exit_code
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // Arithmetic

    pub fn add(&mut self) -> AheuiResult<()> {
        self.current_mut()?.add()
    }

    pub fn sub(&mut self) -> AheuiResult<()> {
        self.current_mut()?.sub()
    }

    pub fn mul(&mut self) -> AheuiResult<()> {
        self.current_mut()?.mul()
    }

    pub fn div(&mut self) -> AheuiResult<()> {
        self.current_mut()?.div()
    }

    pub fn rem(&mut self) -> AheuiResult<()> {
        self.current_mut()?.rem()
    }

    pub fn cmp(&mut self) -> AheuiResult<()> {
        self.current_mut()?.cmp()
    }

    // Storage

    pub fn push(&mut self, value: Value) -> AheuiResult<()> {
        self.current_mut()?.push(value);
        Ok(())
    }

    /// Pop and discard
    pub fn pop(&mut self) -> AheuiResult<()> {
        self.current_mut()?.pop().map(drop)
    }

    pub fn dup(&mut self) -> AheuiResult<()> {
        self.current_mut()?.dup()
    }

    pub fn swap(&mut self) -> AheuiResult<()> {
        self.current_mut()?.swap()
    }

    pub fn select(&mut self, index: usize) -> AheuiResult<()> {
        self.ensure_running()?;
        self.spaces.get(index)?;
        self.selected = index;
        trace!(space = index, "selected");
        Ok(())
    }

    /// Pop from the selected space and push onto space `index`.
    ///
    /// The target is validated before anything is popped. It may be the
    /// selected space itself, which rotates a queue by one.
    pub fn move_to(&mut self, index: usize) -> AheuiResult<()> {
        self.ensure_running()?;
        self.spaces.get(index)?;
        let value = self.current_mut()?.pop()?;
        self.spaces.get_mut(index)?.push(value);
        Ok(())
    }

    // I/O

    pub fn output_number(&mut self) -> AheuiResult<()> {
        let value = self.current_mut()?.pop()?;
        write!(self.output, "{}", value)?;
        Ok(())
    }

    /// Pop a code point and write it encoded. A value outside the code point
    /// range ends the program with that value as its exit code.
    pub fn output_character(&mut self) -> AheuiResult<ControlFlow<Exit>> {
        let value = self.current_mut()?.pop()?;
        if !(0..=MAX_CODEPOINT).contains(&value) {
            debug!(value, "character out of range");
            return self.terminate(value).map(ControlFlow::Break);
        }
        self.output.write_all(&encode(value as u32))?;
        Ok(ControlFlow::Continue(()))
    }

    /// Read one whitespace-delimited decimal token and push it.
    ///
    /// Pending output is flushed first so prompts are visible. Nothing is
    /// pushed when the input is exhausted or the token is not an `i64`.
    pub fn input_number(&mut self) -> AheuiResult<()> {
        self.ensure_running()?;
        self.output.flush()?;
        let value = read_number(&mut self.input)?;
        self.current_mut()?.push(value);
        Ok(())
    }

    /// Reserved primitive; intentionally does nothing.
    pub fn input_character(&mut self) -> AheuiResult<()> {
        self.ensure_running()?;
        trace!("input_character ignored");
        Ok(())
    }

    // Control flow

    /// End the program. The exit code is the popped value of the selected
    /// space, or 0 when it is empty.
    pub fn halt(&mut self) -> AheuiResult<Exit> {
        let storage = self.current_mut()?;
        let code = if storage.is_empty() { 0 } else { storage.pop()? };
        self.terminate(code)
    }

    pub fn branch_if_fewer_than(&self, n: usize) -> AheuiResult<bool> {
        Ok(self.current()?.size() < n)
    }

    /// Pops unconditionally; true when the popped value is zero.
    pub fn branch_if_zero_consuming(&mut self) -> AheuiResult<bool> {
        Ok(self.current_mut()?.pop()? == 0)
    }

    fn terminate(&mut self, code: Value) -> AheuiResult<Exit> {
        self.exit_code = code;
        self.terminated = true;
        debug!(code, "runtime terminated");
        self.output.flush()?;
        Ok(Exit { code })
    }

    fn ensure_running(&self) -> AheuiResult<()> {
        if self.terminated {
            return Err(AheuiError::Terminated);
        }
        Ok(())
    }

    fn current(&self) -> AheuiResult<&Storage> {
        self.ensure_running()?;
        self.spaces.get(self.selected)
    }

    fn current_mut(&mut self) -> AheuiResult<&mut Storage> {
        self.ensure_running()?;
        self.spaces.get_mut(self.selected)
    }
}

fn read_number<R: BufRead>(input: &mut R) -> AheuiResult<Value> {
    let mut token = Vec::new();
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let mut used = 0;
        let mut delimited = false;
        for &byte in buf {
            used += 1;
            if byte.is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                delimited = true;
                break;
            }
            token.push(byte);
        }
        input.consume(used);
        if delimited {
            break;
        }
    }

    if token.is_empty() {
        return Err(AheuiError::UnexpectedEof);
    }
    let text = String::from_utf8_lossy(&token).into_owned();
    text.parse::<Value>().map_err(|_| AheuiError::InputParse(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::spaces::QUEUE_INDEX;

    fn runtime(input: &str) -> Runtime<&[u8], Vec<u8>> {
        Runtime::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn select_routes_unaddressed_ops() {
        let mut rt = runtime("");
        rt.select(3).unwrap();
        rt.push(9).unwrap();
        assert_eq!(rt.selected_index(), 3);
        assert_eq!(rt.space(3).unwrap().to_vec(), vec![9]);
        assert!(rt.space(0).unwrap().is_empty());
    }

    #[test]
    fn select_out_of_range_keeps_selection() {
        let mut rt = runtime("");
        rt.select(5).unwrap();
        assert!(matches!(rt.select(28), Err(AheuiError::InvalidSpace(28))));
        assert_eq!(rt.selected_index(), 5);
    }

    #[test]
    fn move_transfers_one_value() {
        let mut rt = runtime("");
        rt.push(42).unwrap();
        rt.move_to(QUEUE_INDEX).unwrap();
        assert!(rt.space(0).unwrap().is_empty());
        assert_eq!(rt.space(QUEUE_INDEX).unwrap().to_vec(), vec![42]);

        rt.select(QUEUE_INDEX).unwrap();
        rt.move_to(7).unwrap();
        assert!(rt.space(QUEUE_INDEX).unwrap().is_empty());
        assert_eq!(rt.space(7).unwrap().to_vec(), vec![42]);
    }

    #[test]
    fn move_from_queue_takes_oldest() {
        let mut rt = runtime("");
        rt.select(QUEUE_INDEX).unwrap();
        for v in [1, 2, 3] {
            rt.push(v).unwrap();
        }
        rt.move_to(QUEUE_INDEX).unwrap();
        assert_eq!(rt.space(QUEUE_INDEX).unwrap().to_vec(), vec![2, 3, 1]);
    }

    #[test]
    fn move_to_invalid_space_pops_nothing() {
        let mut rt = runtime("");
        rt.push(1).unwrap();
        assert!(rt.move_to(40).is_err());
        assert_eq!(rt.space(0).unwrap().to_vec(), vec![1]);
    }

    #[test]
    fn output_number_writes_decimal() {
        let mut rt = runtime("");
        rt.push(-15).unwrap();
        rt.push(230).unwrap();
        rt.output_number().unwrap();
        rt.output_number().unwrap();
        assert_eq!(rt.output().as_slice(), b"230-15");
    }

    #[test]
    fn output_character_encodes() {
        let mut rt = runtime("");
        rt.push(0x20AC).unwrap();
        rt.push(0x41).unwrap();
        assert_eq!(rt.output_character().unwrap(), ControlFlow::Continue(()));
        assert_eq!(rt.output_character().unwrap(), ControlFlow::Continue(()));
        assert_eq!(rt.output().as_slice(), "A€".as_bytes());
    }

    #[test]
    fn output_character_out_of_range_terminates() {
        let mut rt = runtime("");
        rt.push(0x11_0000).unwrap();
        let flow = rt.output_character().unwrap();
        assert_eq!(flow, ControlFlow::Break(Exit { code: 0x11_0000 }));
        assert_eq!(rt.exit_code(), 0x11_0000);
        assert!(rt.is_terminated());
        assert!(rt.output().is_empty());
    }

    #[test]
    fn negative_character_terminates() {
        let mut rt = runtime("");
        rt.push(-1).unwrap();
        assert_eq!(rt.output_character().unwrap(), ControlFlow::Break(Exit { code: -1 }));
    }

    #[test]
    fn operations_after_termination_fail() {
        let mut rt = runtime("");
        rt.halt().unwrap();
        assert!(matches!(rt.push(1), Err(AheuiError::Terminated)));
        assert!(matches!(rt.select(1), Err(AheuiError::Terminated)));
        assert!(matches!(rt.branch_if_fewer_than(1), Err(AheuiError::Terminated)));
    }

    #[test]
    fn halt_uses_popped_value_or_zero() {
        let mut rt = runtime("");
        rt.push(1).unwrap();
        rt.push(3).unwrap();
        assert_eq!(rt.halt().unwrap(), Exit { code: 3 });

        let mut rt = runtime("");
        assert_eq!(rt.halt().unwrap(), Exit { code: 0 });
        assert_eq!(rt.exit_code(), 0);
    }

    #[test]
    fn halt_pops_queue_front() {
        let mut rt = runtime("");
        rt.select(QUEUE_INDEX).unwrap();
        rt.push(8).unwrap();
        rt.push(9).unwrap();
        assert_eq!(rt.halt().unwrap().code, 8);
    }

    #[test]
    fn branch_predicates() {
        let mut rt = runtime("");
        assert!(rt.branch_if_fewer_than(1).unwrap());
        rt.push(0).unwrap();
        assert!(!rt.branch_if_fewer_than(1).unwrap());
        assert!(rt.branch_if_fewer_than(2).unwrap());

        assert!(rt.branch_if_zero_consuming().unwrap());
        rt.push(4).unwrap();
        assert!(!rt.branch_if_zero_consuming().unwrap());
        assert!(rt.space(0).unwrap().is_empty());
        assert!(rt.branch_if_zero_consuming().is_err());
    }

    #[test]
    fn input_number_reads_tokens() {
        let mut rt = runtime("  12\n-7\t+3");
        rt.input_number().unwrap();
        rt.input_number().unwrap();
        rt.input_number().unwrap();
        assert_eq!(rt.space(0).unwrap().to_vec(), vec![12, -7, 3]);
        assert!(matches!(rt.input_number(), Err(AheuiError::UnexpectedEof)));
    }

    #[test]
    fn input_number_rejects_malformed_token() {
        let mut rt = runtime("12abc 5");
        match rt.input_number() {
            Err(AheuiError::InputParse(token)) => assert_eq!(token, "12abc"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(rt.space(0).unwrap().is_empty());
        assert!(matches!(
            runtime("99999999999999999999").input_number(),
            Err(AheuiError::InputParse(_))
        ));
    }

    #[test]
    fn input_character_is_a_no_op() {
        let mut rt = runtime("x");
        rt.input_character().unwrap();
        assert!(rt.space(0).unwrap().is_empty());
        assert!(rt.output().is_empty());
    }
}
