use std::{io::Write, rc::Rc, time::{SystemTime, UNIX_EPOCH}};

use crate::eval::prelude::{RuntimeError, RuntimeErrorType};

use super::{
    callable::{Callable, NativeFunction},
    value::{ListRef, Value, ValueType}
};

/// Built-ins bound in the global scope.
pub fn globals() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("clock", 0, |_, _| {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as i64)
                .unwrap_or_default();

            Ok(Value::int(millis))
        }),
        NativeFunction::new("print", 1, |ctx, args| {
            let value = args.into_iter().next().unwrap_or_else(Value::null);

            writeln!(ctx.out, "{value}")
                .map_err(|err| RuntimeError::new(RuntimeErrorType::Output { kind: err.kind() }, ctx.paren))?;

            Ok(Value::null())
        }),
    ]
}

fn arguments<const N: usize>(args: Vec<Value>) -> [Value; N] {
    let mut args = args.into_iter();

    std::array::from_fn(|_| args.next().unwrap_or_else(Value::null))
}

/// Methods reached through `list.name`, each bound to the list's storage.
pub fn list_method(list: &ListRef, name: &str) -> Option<Callable> {
    let list = Rc::clone(list);

    let native = match name {
        "add" => NativeFunction::new("add", 1, move |_, args| {
            let [value] = arguments(args);

            list.borrow_mut().push(value);

            Ok(Value::null())
        }),
        "add_range" => NativeFunction::new("add_range", 1, move |ctx, args| {
            let [other] = arguments(args);

            let items = match other.as_list() {
                Some(other) => other.borrow().clone(),
                None => return Err(RuntimeError::new(
                    RuntimeErrorType::InvalidArgument {
                        function: "add_range",
                        expected: ValueType::List,
                        found: other.value_type()
                    },
                    ctx.paren
                ))
            };

            list.borrow_mut().extend(items);

            Ok(Value::null())
        }),
        "insert" => NativeFunction::new("insert", 2, move |ctx, args| {
            let [index, value] = arguments(args);
            let len = list.borrow().len();

            let position = match index.as_int() {
                Some(position) => position,
                None => return Err(RuntimeError::new(
                    RuntimeErrorType::IndexNotInt { owner: "list".into(), index: index.to_string() },
                    ctx.paren
                ))
            };

            match usize::try_from(position).ok().filter(|position| *position <= len) {
                Some(position) => list.borrow_mut().insert(position, value),
                None => return Err(RuntimeError::new(
                    RuntimeErrorType::IndexOutOfBounds { owner: "list".into(), index: position, len },
                    ctx.paren
                ))
            }

            Ok(Value::null())
        }),
        "remove" => NativeFunction::new("remove", 1, move |_, args| {
            let [value] = arguments(args);
            let mut items = list.borrow_mut();

            if let Some(position) = items.iter().position(|item| *item == value) {
                items.remove(position);
            }

            Ok(Value::null())
        }),
        _ => return None
    };

    Some(Callable::native(native))
}
