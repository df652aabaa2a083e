use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use crate::errors::errors::ErrorImpl;

use super::value::Value;

/// I/O seen by a running program.
pub trait Environment {
    /// Next input value. Blocks until one is available and fails once input is exhausted.
    fn read(&mut self) -> Result<Value, ErrorImpl>;
    /// Emits one value. Never fails for a well-typed value.
    fn write(&mut self, value: Value);
}

/// Deterministic environment serving inputs from a queue and recording every write.
#[derive(Debug, Clone, Default)]
pub struct FakeEnvironment {
    inputs: VecDeque<Value>,
    outputs: Vec<Value>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        FakeEnvironment::default()
    }

    pub fn with_inputs(inputs: impl IntoIterator<Item = Value>) -> Self {
        FakeEnvironment {
            inputs: inputs.into_iter().collect(),
            outputs: vec![],
        }
    }

    pub fn push_input(&mut self, value: Value) {
        self.inputs.push_back(value);
    }

    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    /// Outputs rendered the way `print` displays them.
    pub fn written_text(&self) -> Vec<String> {
        self.outputs.iter().map(|value| value.to_string()).collect()
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Environment for FakeEnvironment {
    fn read(&mut self) -> Result<Value, ErrorImpl> {
        self.inputs.pop_front().ok_or(ErrorImpl::InputExhausted)
    }

    fn write(&mut self, value: Value) {
        self.outputs.push(value);
    }
}

/// Line-oriented environment over a reader and a writer, stdin/stdout by default.
pub struct ConsoleEnvironment<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleEnvironment<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsoleEnvironment {
            reader: io::stdin().lock(),
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsoleEnvironment<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        ConsoleEnvironment { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Environment for ConsoleEnvironment<R, W> {
    fn read(&mut self) -> Result<Value, ErrorImpl> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(ErrorImpl::InputExhausted),
            Ok(_) => Ok(parse_input_line(&line)),
            Err(error) => {
                tracing::warn!(%error, "failed to read input");
                Err(ErrorImpl::InputExhausted)
            }
        }
    }

    fn write(&mut self, value: Value) {
        if let Err(error) = writeln!(self.writer, "{}", value) {
            tracing::warn!(%error, "failed to write output");
        }
    }
}

/// Interprets one line of console input as an int, float, bool or string, in that order.
pub fn parse_input_line(line: &str) -> Value {
    let text = line.trim();

    if let Ok(value) = text.parse::<i32>() {
        Value::Int(value)
    } else if let Ok(value) = text.parse::<f32>() {
        Value::Float(value)
    } else if let Ok(value) = text.parse::<bool>() {
        Value::Bool(value)
    } else {
        Value::String(String::from(line.trim_end_matches(['\r', '\n'])))
    }
}
