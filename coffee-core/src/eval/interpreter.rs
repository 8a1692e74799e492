use std::{cell::RefCell, collections::BTreeMap, io::{self, Write}, mem, rc::Rc};

use tracing::debug;

use crate::{
    environment::{native, prelude::{Callable, Environment, NativeContext, Payload, Value}},
    lexer::prelude::Token,
    parser::prelude::{Binary, Call, Expression, FunctionDecl, ObjectLiteral, Primitive, Statement},
    utils::prelude::ensure_sufficient_stack
};

use super::{
    error::{RuntimeError, RuntimeErrorType},
    operators
};

/// Active user-function calls allowed before `Stack overflow.`
pub const MAX_CALL_DEPTH: usize = 4096;

/// How a statement finished. `Returned` unwinds up to the nearest call.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Completed,
    Returned(Value)
}

pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    out: Box<dyn Write>,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter whose `print` goes to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    pub fn with_output(out: impl Write + 'static) -> Self {
        let mut globals = Environment::new();

        for function in native::globals() {
            globals.define_native(function);
        }

        let globals = Rc::new(RefCell::new(globals));

        Self {
            environment: Rc::clone(&globals),
            globals,
            out: Box::new(out),
            depth: 0
        }
    }

    /// Runs each statement against the global scope, stopping at the first runtime error.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
    pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        for statement in statements {
            // A top-level `return` is rejected by the parser, so the flow is always `Completed` here.
            self.execute(statement)?;
        }

        Ok(())
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<Flow, RuntimeError> {
        ensure_sufficient_stack(|| self.execute_statement(statement))
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<Flow, RuntimeError> {
        match statement {
            Statement::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));

                self.execute_block(statements, Rc::new(RefCell::new(scope)))
            },
            Statement::Expression(expression) => {
                self.evaluate(expression)?;

                Ok(Flow::Completed)
            },
            Statement::Function(declaration) => {
                let function = self.bind_function(declaration);

                self.environment.borrow_mut().define(&declaration.name, function)?;

                Ok(Flow::Completed)
            },
            Statement::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Completed)
                }
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::null()
                };

                Ok(Flow::Returned(value))
            },
            Statement::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::null()
                };

                self.environment.borrow_mut().define(name, value.with_name(name))?;

                Ok(Flow::Completed)
            },
            Statement::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Returned(value) = self.execute(body)? {
                        return Ok(Flow::Returned(value));
                    }
                }

                Ok(Flow::Completed)
            }
        }
    }

    /// Runs `statements` inside `scope`. The previous scope is back in place however this returns.
    pub fn execute_block(
        &mut self,
        statements: &[Statement],
        scope: Rc<RefCell<Environment>>
    ) -> Result<Flow, RuntimeError> {
        let previous = mem::replace(&mut self.environment, scope);

        let flow = self.execute_statements(statements);

        self.environment = previous;

        flow
    }

    fn execute_statements(&mut self, statements: &[Statement]) -> Result<Flow, RuntimeError> {
        for statement in statements {
            if let Flow::Returned(value) = self.execute(statement)? {
                return Ok(Flow::Returned(value));
            }
        }

        Ok(Flow::Completed)
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_expression(expression))
    }

    fn evaluate_expression(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Assign { target, value } => self.evaluate_assign(target, value),
            Expression::Binary(binary) => self.evaluate_binary(binary),
            Expression::Access { left, op, member } => self.evaluate(left)?.dot_access(op, member),
            Expression::Call(call) => self.evaluate_call(call),
            Expression::Grouping(inner) => self.evaluate(inner),
            Expression::Literal { value, .. } => Ok(match value {
                Primitive::Int(value) => Value::int(*value),
                Primitive::Bool(value) => Value::bool(*value),
                Primitive::String(value) => Value::string(value.as_str()),
                Primitive::Null => Value::null()
            }),
            Expression::List(list) => {
                let elements = list.elements.iter()
                    .map(|element| self.evaluate(element))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Value::list(elements))
            },
            Expression::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;

                operators::unary(op, operand)
            },
            Expression::Variable { name } => self.environment.borrow().get(name),
            Expression::Object(object) => self.evaluate_object(object)
        }
    }

    fn evaluate_assign(&mut self, target: &Expression, value: &Expression) -> Result<Value, RuntimeError> {
        let value = self.evaluate(value)?;

        match target {
            Expression::Variable { name } => {
                self.environment.borrow_mut().assign(name, value.clone())?;
            },
            Expression::Access { left, op, member } => {
                self.evaluate(left)?.assign_member(op, member, value.clone())?;
            },
            other => return Err(RuntimeError::new(
                RuntimeErrorType::InvalidAssignmentTarget,
                other.token()
            ))
        }

        Ok(value)
    }

    // Both operands are always evaluated, `and` and `or` included.
    fn evaluate_binary(&mut self, binary: &Binary) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        if binary.is_index() {
            return left.index_access(&binary.op, &right);
        }

        operators::binary(&binary.op, left, right)
    }

    fn evaluate_call(&mut self, call: &Call) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&call.callee)?;

        let args = call.args.iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;

        self.call(callee, args, &call.paren)
    }

    /// Invokes `callee` once its arity matches `args`.
    pub fn call(&mut self, callee: Value, args: Vec<Value>, paren: &Token) -> Result<Value, RuntimeError> {
        let callable = match &callee.payload {
            Payload::Function(callable) => callable.clone(),
            _ => return Err(RuntimeError::new(RuntimeErrorType::NotCallable, paren))
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                RuntimeErrorType::ArityMismatch {
                    expected: callable.arity(),
                    found: args.len()
                },
                paren
            ));
        }

        match callable {
            Callable::Native(native) => {
                let mut ctx = NativeContext { out: &mut *self.out, paren };

                (native.body)(&mut ctx, args)
            },
            Callable::Function(function) => {
                self.call_function(&function.declaration, Rc::clone(&function.closure), args, paren)
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %declaration.name.lexeme, depth = self.depth))]
    fn call_function(
        &mut self,
        declaration: &FunctionDecl,
        closure: Rc<RefCell<Environment>>,
        args: Vec<Value>,
        paren: &Token
    ) -> Result<Value, RuntimeError> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::new(RuntimeErrorType::StackOverflow, paren));
        }

        let mut scope = Environment::with_enclosing(closure);

        for (param, arg) in declaration.params.iter().zip(args) {
            scope.define(param, arg.with_name(param))?;
        }

        self.depth += 1;

        let flow = self.execute_block(&declaration.body, Rc::new(RefCell::new(scope)));

        self.depth -= 1;

        match flow? {
            Flow::Returned(value) => {
                debug!("returned {}", value.value_type());

                Ok(value)
            },
            Flow::Completed => Ok(Value::null())
        }
    }

    fn bind_function(&self, declaration: &Rc<FunctionDecl>) -> Value {
        let callable = Callable::function(Rc::clone(declaration), Rc::clone(&self.environment));

        Value::function(callable).with_name(&declaration.name)
    }

    // Members are built against the current scope: methods close over it, not over the object.
    fn evaluate_object(&mut self, object: &ObjectLiteral) -> Result<Value, RuntimeError> {
        let mut members = BTreeMap::new();

        for declaration in &object.declarations {
            let (name, value) = match declaration {
                Statement::Var { name, initializer } => {
                    let value = match initializer {
                        Some(initializer) => self.evaluate(initializer)?,
                        None => Value::null()
                    };

                    (name, value.with_name(name))
                },
                Statement::Function(function) => (&function.name, self.bind_function(function)),
                other => {
                    self.execute(other)?;

                    continue;
                }
            };

            if members.contains_key(&name.lexeme) {
                return Err(RuntimeError::new(
                    RuntimeErrorType::DuplicateDefinition { name: name.lexeme.clone() },
                    name
                ));
            }

            members.insert(name.lexeme.clone(), value);
        }

        Ok(Value::object(members))
    }
}
