use crate::cnf::cnf::Lit;

/// Ternary value of a single variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Value {
    False = -1,
    #[default]
    Unassigned = 0,
    True = 1,
}

impl Value {
    pub fn from_bool(b: bool) -> Self {
        if b { Value::True } else { Value::False }
    }

    pub fn to_bool(self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            Value::Unassigned => None,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Value::Unassigned
    }
}

/// Partial assignment over variables `1..=num_vars`, stored 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Value>,
}

impl Assignment {
    pub fn new(num_vars: u32) -> Self {
        Self {
            values: vec![Value::Unassigned; num_vars as usize],
        }
    }

    pub fn num_vars(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn get(&self, var: u32) -> Value {
        self.values[var as usize - 1]
    }

    pub fn set(&mut self, var: u32, value: Value) {
        self.values[var as usize - 1] = value;
    }

    pub fn is_assigned(&self, var: u32) -> bool {
        self.get(var).is_assigned()
    }

    /// Truth value of `lit`, or `None` while its variable is unassigned.
    pub fn eval(&self, lit: Lit) -> Option<bool> {
        self.get(lit.var()).to_bool().map(|v| lit.eval(v))
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// First unassigned variable at or after `from`.
    pub fn next_unassigned(&self, from: u32) -> Option<u32> {
        (from.max(1)..=self.num_vars()).find(|&var| !self.is_assigned(var))
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| v.is_assigned())
    }

    /// Total view of the assignment; free variables read as false.
    pub fn to_values(&self) -> Vec<bool> {
        self.values
            .iter()
            .map(|v| v.to_bool().unwrap_or(false))
            .collect()
    }
}

/// Assignments made by one search frame, with the values they replaced.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    saved: Vec<(u32, Value)>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `lit` true in `assignment`, remembering the previous value.
    pub fn assign(&mut self, assignment: &mut Assignment, lit: Lit) {
        self.saved.push((lit.var(), assignment.get(lit.var())));
        assignment.set(lit.var(), Value::from_bool(lit.sign()));
    }

    /// Restores every recorded variable, newest first, and clears the log.
    pub fn rollback(&mut self, assignment: &mut Assignment) {
        for (var, prev) in self.saved.drain(..).rev() {
            assignment.set(var, prev);
        }
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}
