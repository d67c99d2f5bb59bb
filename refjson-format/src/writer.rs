//! Compact JSON writer

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object { members: usize },
    Array { elements: usize },
}

/// Streaming writer producing compact JSON text
#[derive(Debug, Default)]
pub struct JsonWriter {
    out: String,
    stack: Vec<Frame>,
    pending_name: bool,
}

impl JsonWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    fn before_value(&mut self) -> Result<()> {
        if self.pending_name {
            self.pending_name = false;
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(Frame::Object { .. }) => Err(Error::custom("object value written without a member name")),
            Some(Frame::Array { elements }) => {
                if *elements > 0 {
                    self.out.push(',');
                }
                *elements += 1;
                Ok(())
            }
            None if !self.out.is_empty() => Err(Error::custom("top-level value already written")),
            None => Ok(()),
        }
    }

    /// Write `{`
    pub fn begin_object(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('{');
        self.stack.push(Frame::Object { members: 0 });
        Ok(())
    }

    /// Write `}`
    pub fn end_object(&mut self) -> Result<()> {
        if self.pending_name {
            return Err(Error::custom("member name written without a value"));
        }
        match self.stack.pop() {
            Some(Frame::Object { .. }) => {
                self.out.push('}');
                Ok(())
            }
            _ => Err(Error::custom("end_object without matching begin_object")),
        }
    }

    /// Write `[`
    pub fn begin_array(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('[');
        self.stack.push(Frame::Array { elements: 0 });
        Ok(())
    }

    /// Write `]`
    pub fn end_array(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Array { .. }) => {
                self.out.push(']');
                Ok(())
            }
            _ => Err(Error::custom("end_array without matching begin_array")),
        }
    }

    /// Write an object member name followed by `:`
    pub fn name(&mut self, name: &str) -> Result<()> {
        if self.pending_name {
            return Err(Error::custom("two member names in a row"));
        }
        match self.stack.last_mut() {
            Some(Frame::Object { members }) => {
                if *members > 0 {
                    self.out.push(',');
                }
                *members += 1;
            }
            _ => return Err(Error::custom("member name outside of an object")),
        }
        self.push_quoted(name)?;
        self.out.push(':');
        self.pending_name = true;
        Ok(())
    }

    /// Write a string scalar
    pub fn string(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        self.push_quoted(value)
    }

    /// Write an integer scalar
    pub fn i64(&mut self, value: i64) -> Result<()> {
        self.before_value()?;
        self.out.push_str(&value.to_string());
        Ok(())
    }

    /// Write a float scalar; NaN and infinities are rejected
    pub fn f64(&mut self, value: f64) -> Result<()> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| Error::InvalidValue {
            expected: "finite float",
            found: value.to_string(),
        })?;
        self.before_value()?;
        self.out.push_str(&number.to_string());
        Ok(())
    }

    /// Write `true` or `false`
    pub fn bool(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    /// Write `null`
    pub fn null(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push_str("null");
        Ok(())
    }

    fn push_quoted(&mut self, value: &str) -> Result<()> {
        let quoted = serde_json::to_string(value)?;
        self.out.push_str(&quoted);
        Ok(())
    }

    /// Text written so far
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finish writing and return the document
    pub fn into_string(self) -> Result<String> {
        if !self.stack.is_empty() || self.pending_name {
            return Err(Error::custom("document has unclosed objects or arrays"));
        }
        Ok(self.out)
    }
}
