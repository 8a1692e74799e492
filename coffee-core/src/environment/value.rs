use std::{cell::RefCell, collections::BTreeMap, fmt::{self, Display}, mem, rc::Rc};

use crate::{
    eval::prelude::{RuntimeError, RuntimeErrorType},
    lexer::prelude::Token,
    utils::prelude::ensure_sufficient_stack
};

use super::{callable::Callable, native};

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Bool,
    Func,
    String,
    List,
    Object,
    Null
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "Int",
            Self::Bool => "Bool",
            Self::Func => "Func",
            Self::String => "String",
            Self::List => "List",
            Self::Object => "Object",
            Self::Null => "Null"
        };

        write!(f, "{name}")
    }
}

/// Scalars are held inline, lists and objects behind a shared handle.
#[derive(Debug, Clone)]
pub enum Payload {
    Int(i64),
    Bool(bool),
    Function(Callable),
    String(String),
    List(ListRef),
    Object(ObjectRef),
    Null
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false
        }
    }
}

impl Payload {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Bool(_) => ValueType::Bool,
            Self::Function(_) => ValueType::Func,
            Self::String(_) => ValueType::String,
            Self::List(_) => ValueType::List,
            Self::Object(_) => ValueType::Object,
            Self::Null => ValueType::Null
        }
    }

    /// Moves the items of a container this payload solely owns into `pending`.
    fn take_items(&mut self, pending: &mut Vec<Payload>) {
        match self {
            Self::List(list) => if let Some(items) = Rc::get_mut(list) {
                pending.extend(mem::take(items.get_mut()).into_iter().map(|item| item.payload));
            },
            Self::Object(object) => if let Some(members) = Rc::get_mut(object) {
                pending.extend(mem::take(members.get_mut()).into_values().map(|item| item.payload));
            },
            _ => {}
        }
    }

    // `seen` holds the containers currently being written, so a list holding itself prints `[...]`.
    fn write(&self, f: &mut fmt::Formatter<'_>, seen: &mut Vec<*const ()>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Function(callable) => write!(f, "{callable}"),
            Self::String(value) => write!(f, "{value}"),
            Self::Null => write!(f, "null"),
            Self::List(list) => {
                let id = Rc::as_ptr(list) as *const ();

                if seen.contains(&id) {
                    return write!(f, "[...]");
                }

                seen.push(id);
                write!(f, "[")?;

                for (idx, item) in list.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }

                    ensure_sufficient_stack(|| item.payload.write(f, seen))?;
                }

                seen.pop();
                write!(f, "]")
            },
            Self::Object(object) => {
                let id = Rc::as_ptr(object) as *const ();

                if seen.contains(&id) {
                    return write!(f, "{{...}}");
                }

                seen.push(id);
                write!(f, "{{")?;

                for (idx, (key, item)) in object.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{key}: ")?;
                    ensure_sufficient_stack(|| item.payload.write(f, seen))?;
                }

                seen.pop();
                write!(f, "}}")
            }
        }
    }
}

// Nested containers are released one level at a time instead of recursively.
impl Drop for Payload {
    fn drop(&mut self) {
        let mut pending = vec![];
        self.take_items(&mut pending);

        while let Some(mut payload) = pending.pop() {
            payload.take_items(&mut pending);
        }
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, &mut vec![])
    }
}

/// A runtime value plus the name it was last bound to, kept for messages.
#[derive(Debug, Clone)]
pub struct Value {
    pub payload: Payload,
    pub name: Option<Token>,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Self { payload, name: None }
    }
}

impl Value {
    pub fn int(value: i64) -> Self {
        Payload::Int(value).into()
    }

    pub fn bool(value: bool) -> Self {
        Payload::Bool(value).into()
    }

    pub fn string(value: impl Into<String>) -> Self {
        Payload::String(value.into()).into()
    }

    pub fn list(items: Vec<Value>) -> Self {
        Payload::List(Rc::new(RefCell::new(items))).into()
    }

    pub fn object(members: BTreeMap<String, Value>) -> Self {
        Payload::Object(Rc::new(RefCell::new(members))).into()
    }

    pub fn function(callable: Callable) -> Self {
        Payload::Function(callable).into()
    }

    pub fn null() -> Self {
        Payload::Null.into()
    }

    pub fn with_name(mut self, name: &Token) -> Self {
        self.name = Some(name.clone());
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.payload.value_type()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            _ => None
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match &self.payload {
            Payload::List(list) => Some(list),
            _ => None
        }
    }

    /// Null and `false` are falsy, Int is falsy only when zero, the rest is truthy.
    pub fn is_truthy(&self) -> bool {
        match self.payload {
            Payload::Null => false,
            Payload::Bool(value) => value,
            Payload::Int(value) => value != 0,
            _ => true
        }
    }

    /// Name used in access errors: the binding name, or the type if unnamed.
    pub fn owner(&self) -> String {
        match &self.name {
            Some(name) if !name.lexeme.is_empty() => name.lexeme.clone(),
            _ => self.value_type().to_string()
        }
    }

    fn undefined_member(&self, member: &Token) -> RuntimeError {
        RuntimeError::new(
            RuntimeErrorType::UndefinedMember {
                member: member.lexeme.clone(),
                owner: self.owner()
            },
            member
        )
    }

    pub fn dot_access(&self, op: &Token, member: &Token) -> Result<Value, RuntimeError> {
        match &self.payload {
            Payload::String(value) => match member.lexeme.as_str() {
                "size" => Ok(Value::int(value.chars().count() as i64)),
                _ => Err(self.undefined_member(member))
            },
            Payload::List(list) => match member.lexeme.as_str() {
                "size" => Ok(Value::int(list.borrow().len() as i64)),
                name => match native::list_method(list, name) {
                    Some(method) => Ok(Value::function(method)),
                    None => Err(self.undefined_member(member))
                }
            },
            Payload::Object(object) => match object.borrow().get(&member.lexeme) {
                Some(value) => Ok(value.clone()),
                None => Err(self.undefined_member(member))
            },
            _ => Err(RuntimeError::new(
                RuntimeErrorType::UnsupportedDotAccess { found: self.value_type() },
                op
            ))
        }
    }

    pub fn index_access(&self, op: &Token, index: &Value) -> Result<Value, RuntimeError> {
        let len = match &self.payload {
            Payload::List(list) => list.borrow().len(),
            Payload::Object(object) => object.borrow().len(),
            _ => return Err(RuntimeError::new(
                RuntimeErrorType::UnsupportedIndexAccess { found: self.value_type() },
                op
            ))
        };

        let position = match index.as_int() {
            Some(position) => position,
            None => return Err(RuntimeError::new(
                RuntimeErrorType::IndexNotInt {
                    owner: self.owner(),
                    index: index.to_string()
                },
                op
            ))
        };

        let item = usize::try_from(position).ok()
            .filter(|position| *position < len)
            .and_then(|position| match &self.payload {
                Payload::List(list) => list.borrow().get(position).cloned(),
                Payload::Object(object) => object.borrow().values().nth(position).cloned(),
                _ => None
            });

        item.ok_or_else(|| RuntimeError::new(
            RuntimeErrorType::IndexOutOfBounds {
                owner: self.owner(),
                index: position,
                len
            },
            op
        ))
    }

    /// Overwrites an existing object member; every alias of the object sees it.
    pub fn assign_member(&self, op: &Token, member: &Token, value: Value) -> Result<(), RuntimeError> {
        match &self.payload {
            Payload::Object(object) => {
                let mut members = object.borrow_mut();

                match members.get_mut(&member.lexeme) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    },
                    None => Err(self.undefined_member(member))
                }
            },
            _ => Err(RuntimeError::new(
                RuntimeErrorType::UnsupportedMemberAssignment { found: self.value_type() },
                op
            ))
        }
    }
}
