use serde_json::{Map, Value};
use thiserror::Error;

/// Where the builder currently is, tracked at run time. Every operation
/// checks the state it is called in and reports an illegal transition
/// instead of panicking or relying on type-level enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Empty,
    InArray,
    InDict,
    AwaitingValueForKey,
    Complete,
}

#[derive(Error, Debug)]
#[error("illegal `{op}` while {state:?}")]
pub struct Error {
    op: &'static str,
    state: State,
}

#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Dict(Map<String, Value>, Option<String>),
}

/// Assembles one [`serde_json::Value`] through explicit state
/// transitions.
///
/// Methods consume the builder so calls chain with `?`; a misuse ends
/// the chain with an [`Error`] naming the operation and the state it
/// was attempted in.
#[derive(Debug, Default)]
pub struct Builder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl Builder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> State {
        match (self.stack.last(), &self.root) {
            (None, None) => State::Empty,
            (None, Some(_)) => State::Complete,
            (Some(Frame::Array(_)), _) => State::InArray,
            (Some(Frame::Dict(_, None)), _) => State::InDict,
            (Some(Frame::Dict(_, Some(_))), _) => State::AwaitingValueForKey,
        }
    }

    fn illegal(&self, op: &'static str) -> Error {
        Error {
            op,
            state: self.state(),
        }
    }

    fn accepts_value(&self) -> bool {
        matches!(
            self.state(),
            State::Empty | State::InArray | State::AwaitingValueForKey
        )
    }

    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Dict(map, pending)) => {
                // accepts_value guarantees the pending key is set.
                if let Some(key) = pending.take() {
                    map.insert(key, value);
                }
            }
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Result<Self, Error> {
        if !self.accepts_value() {
            return Err(self.illegal("value"));
        }
        self.push_value(value.into());
        Ok(self)
    }

    pub fn key(mut self, key: impl Into<String>) -> Result<Self, Error> {
        match self.stack.last_mut() {
            Some(Frame::Dict(_, pending @ None)) => {
                *pending = Some(key.into());
                Ok(self)
            }
            _ => Err(self.illegal("key")),
        }
    }

    pub fn start_dict(mut self) -> Result<Self, Error> {
        if !self.accepts_value() {
            return Err(self.illegal("start_dict"));
        }
        self.stack.push(Frame::Dict(Map::new(), None));
        Ok(self)
    }

    pub fn end_dict(mut self) -> Result<Self, Error> {
        match self.stack.last() {
            Some(Frame::Dict(_, None)) => {
                let Some(Frame::Dict(map, _)) = self.stack.pop() else {
                    unreachable!()
                };
                self.push_value(Value::Object(map));
                Ok(self)
            }
            _ => Err(self.illegal("end_dict")),
        }
    }

    pub fn start_array(mut self) -> Result<Self, Error> {
        if !self.accepts_value() {
            return Err(self.illegal("start_array"));
        }
        self.stack.push(Frame::Array(Vec::new()));
        Ok(self)
    }

    pub fn end_array(mut self) -> Result<Self, Error> {
        match self.stack.last() {
            Some(Frame::Array(_)) => {
                let Some(Frame::Array(items)) = self.stack.pop() else {
                    unreachable!()
                };
                self.push_value(Value::Array(items));
                Ok(self)
            }
            _ => Err(self.illegal("end_array")),
        }
    }

    pub fn build(self) -> Result<Value, Error> {
        match self.state() {
            State::Complete => Ok(self.root.unwrap_or(Value::Null)),
            _ => Err(self.illegal("build")),
        }
    }
}

#[test]
fn builds_nested_value_test() {
    let value = Builder::new()
        .start_dict()
        .unwrap()
        .key("items")
        .unwrap()
        .start_array()
        .unwrap()
        .value(1)
        .unwrap()
        .value(2)
        .unwrap()
        .end_array()
        .unwrap()
        .key("ok")
        .unwrap()
        .value(true)
        .unwrap()
        .end_dict()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(value, serde_json::json!({"items": [1, 2], "ok": true}));
}

#[test]
fn rejects_key_outside_dict_test() {
    let result = Builder::new().key("oops");
    assert!(result.is_err());
}

#[test]
fn rejects_second_root_test() {
    let result = Builder::new().value(1).unwrap().value(2);
    assert!(result.is_err());
}

#[test]
fn rejects_end_dict_with_pending_key_test() {
    let result = Builder::new()
        .start_dict()
        .unwrap()
        .key("dangling")
        .unwrap()
        .end_dict();
    assert!(result.is_err());
}

#[test]
fn rejects_empty_build_test() {
    assert!(Builder::new().build().is_err());
}
