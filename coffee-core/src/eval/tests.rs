use std::{cell::RefCell, io::{self, Write}, rc::Rc};

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Value, ValueType},
    parser::prelude::{parse_source, Parsed, Statement}
};

use super::prelude::{Interpreter, RuntimeError, RuntimeErrorType};

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> String {
        String::from_utf8(self.0.take()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn parsed(src: &str) -> Parsed {
    parse_source(src)
        .into_result()
        .unwrap_or_else(|errors| panic!("unexpected parse errors: {errors:#?}"))
}

fn session() -> (Interpreter, SharedBuffer) {
    let out = SharedBuffer::default();

    (Interpreter::with_output(out.clone()), out)
}

fn run_in(interpreter: &mut Interpreter, src: &str) -> Result<(), RuntimeError> {
    interpreter.interpret(&parsed(src).statements)
}

fn output(src: &str) -> String {
    let (mut interpreter, out) = session();

    if let Err(err) = run_in(&mut interpreter, src) {
        panic!("unexpected runtime error: {err}");
    }

    out.take()
}

fn failure(src: &str) -> RuntimeErrorType {
    let (mut interpreter, _) = session();

    match run_in(&mut interpreter, src) {
        Ok(()) => panic!("expected a runtime error from {src:?}"),
        Err(err) => err.error
    }
}

#[test]
fn test_precedence_value() {
    let (mut interpreter, _) = session();
    let program = parsed("1 + 2 * 3;");

    let value = match &program.statements[..] {
        [Statement::Expression(expression)] => interpreter.evaluate(expression).unwrap(),
        other => panic!("unexpected program {other:?}")
    };

    assert_eq!(value, Value::int(7));
}

#[test]
fn test_block_scoping() {
    assert_eq!(output("var x = 1; { var x = 2; print(x); } print(x);"), "2\n1\n");
}

#[test]
fn test_closure_counter() {
    let src = "
        fun make() {
            var n = 0;
            fun inc() { n = n + 1; return n; }
            return inc;
        }
        var f = make();
        print(f());
        print(f());
    ";

    assert_eq!(output(src), "1\n2\n");
}

#[test]
fn test_closures_are_independent() {
    let src = "
        fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }
        var a = make();
        var b = make();
        a(); a();
        print(a());
        print(b());
    ";

    assert_eq!(output(src), "3\n1\n");
}

#[test]
fn test_list_aliasing() {
    assert_eq!(output("var l = [1,2]; var m = l; m.add(3); print(l.size);"), "3\n");
}

#[test]
fn test_scalar_assignment_does_not_alias() {
    assert_eq!(output("var a = 1; var b = a; b = 2; print(a); print(b);"), "1\n2\n");
}

#[test]
fn test_arity_mismatch_never_runs_body() {
    let (mut interpreter, out) = session();

    let err = run_in(&mut interpreter, "var hits = 0; fun f(a) { hits = hits + 1; } f(1, 2);").unwrap_err();
    assert_eq!(err.error, RuntimeErrorType::ArityMismatch { expected: 1, found: 2 });
    assert_eq!(err.to_string(), "Expected 1 arguments but got 2.\n[line 1]");

    run_in(&mut interpreter, "print(hits);").unwrap();
    assert_eq!(out.take(), "0\n");
}

#[test]
fn test_error_restores_environment() {
    let (mut interpreter, out) = session();

    let err = run_in(&mut interpreter, "fun f() { var inner = 1; 1 / 0; } f();").unwrap_err();
    assert_eq!(err.error, RuntimeErrorType::DivisionByZero);

    run_in(&mut interpreter, "{ var y = 1; missing; }").unwrap_err();

    run_in(&mut interpreter, "var inner = 2; var y = 3; print(inner + y);").unwrap();
    assert_eq!(out.take(), "5\n");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(failure("1 / 0;"), RuntimeErrorType::DivisionByZero);
    assert_eq!(failure("5 % 0;"), RuntimeErrorType::DivisionByZero);

    let (mut interpreter, _) = session();
    let err = run_in(&mut interpreter, "\n1 / 0;").unwrap_err();

    assert_eq!(err.to_string(), "Division by zero.\n[line 2]");
}

#[test]
fn test_integer_overflow() {
    assert_eq!(failure("9223372036854775807 + 1;"), RuntimeErrorType::IntegerOverflow);
    assert_eq!(failure("-9223372036854775807 - 2;"), RuntimeErrorType::IntegerOverflow);
    assert_eq!(output("print(7 / 2); print(7 % 3); print(-7 / 2);"), "3\n1\n-3\n");
}

#[test]
fn test_logic_never_short_circuits() {
    let src = "
        var n = 0;
        fun bump() { n = n + 1; return true; }
        false and bump();
        true or bump();
        print(n);
    ";

    assert_eq!(output(src), "2\n");
}

#[test]
fn test_logic_truthiness() {
    assert_eq!(output("print(1 and 0); print(0 or \"a\"); print(null or false);"), "false\ntrue\nfalse\n");
}

#[test]
fn test_list_set_operators() {
    assert_eq!(output("print([1, 2, 2] or [2, 3]);"), "[1, 2, 3]\n");
    assert_eq!(output("print([1, 2, 3] and [2]);"), "[1, 3]\n");
    assert_eq!(output("print([1, 2] or 3);"), "[1, 2, 3]\n");
    assert_eq!(output("print(2 or [1, 2]);"), "[1, 2]\n");
    assert_eq!(output("print([1, 2, 1] and 1);"), "[2]\n");
    assert_eq!(output("print(1 and [1, 2]);"), "[2]\n");
}

#[test]
fn test_plus_rules() {
    let src = r#"
        print(1 + 2);
        print("a" + 1);
        print(true + "b");
        print("l" + [1]);
        print([1] + [2]);
        print([1] + 2);
        print(0 + [1]);
    "#;

    assert_eq!(output(src), "3\na1\ntrueb\nl[1]\n[1, 2]\n[1, 2]\n[0, 1]\n");
    assert_eq!(failure("true + 1;"), RuntimeErrorType::InvalidPlusOperands);
    assert_eq!(failure("null + null;"), RuntimeErrorType::InvalidPlusOperands);
}

#[test]
fn test_plus_on_lists_builds_a_new_list() {
    assert_eq!(output("var a = [1]; var b = a + 2; print(a); print(b);"), "[1]\n[1, 2]\n");
}

#[test]
fn test_operand_types() {
    assert_eq!(failure("1 < \"a\";"), RuntimeErrorType::OperandNotNumber { found: ValueType::String });
    assert_eq!(failure("-true;"), RuntimeErrorType::OperandNotNumber { found: ValueType::Bool });
    assert_eq!(failure("null * 2;"), RuntimeErrorType::OperandNotNumber { found: ValueType::Null });
    assert_eq!(failure("true - null;"), RuntimeErrorType::OperandNotNumber { found: ValueType::Bool });
    assert_eq!(output("print(!0); print(-(3)); print(!!null); print(2 >= 2);"), "true\n-3\nfalse\ntrue\n");
}

#[test]
fn test_equality() {
    let src = r#"
        var l = [1];
        var m = l;
        print([1] == [1]);
        print(l == m);
        print(1 == true);
        print(null == null);
        print("a" != "b");
        print(0 == null);
    "#;

    assert_eq!(output(src), "false\ntrue\nfalse\ntrue\ntrue\nfalse\n");
}

#[test]
fn test_truthiness_in_conditions() {
    let src = r#"
        if (0) print(1); else print(2);
        if ("") print(3);
        if (null) print(4); else print(5);
        if ([]) print(6);
    "#;

    assert_eq!(output(src), "2\n3\n5\n6\n");
}

#[test]
fn test_loops() {
    assert_eq!(output("for (var i = 0; i < 3; i = i + 1) print(i);"), "0\n1\n2\n");
    assert_eq!(output("var i = 3; while (i) { i -= 1; } print(i);"), "0\n");
}

#[test]
fn test_return_unwinds_loops_and_blocks() {
    let (mut interpreter, out) = session();
    let src = "
        fun first(l) {
            var i = 0;
            while (i < l.size) {
                if (l[i] > 1) { return l[i]; }
                i = i + 1;
            }
            return null;
        }
        print(first([1, 5, 7]));
        print(first([0]));
    ";

    run_in(&mut interpreter, src).unwrap();
    run_in(&mut interpreter, "var i = 9; print(i);").unwrap();

    assert_eq!(out.take(), "5\nnull\n9\n");
}

#[test]
fn test_function_without_return_yields_null() {
    assert_eq!(output("fun f() { 1; } print(f()); fun g() { return; } print(g());"), "null\nnull\n");
}

#[test]
fn test_recursion() {
    let src = "
        fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
        print(fib(15));
    ";

    assert_eq!(output(src), "610\n");
}

#[test]
fn test_unbounded_recursion_is_stack_overflow() {
    assert_eq!(failure("fun f() { return f(); } f();"), RuntimeErrorType::StackOverflow);
}

#[test]
fn test_duplicate_definitions() {
    assert_eq!(
        failure("var a = 1; var a = 2;"),
        RuntimeErrorType::DuplicateDefinition { name: "a".into() }
    );
    assert_eq!(
        failure("fun f(a, a) {} f(1, 2);"),
        RuntimeErrorType::DuplicateDefinition { name: "a".into() }
    );
    assert_eq!(
        failure("var o = { var a = 1; fun a() {} };"),
        RuntimeErrorType::DuplicateDefinition { name: "a".into() }
    );
    assert_eq!(output("var a = 1; { var a = 2; } fun f(a) { var b = a; return b; } print(f(a));"), "1\n");
}

#[test]
fn test_variables() {
    let (mut interpreter, _) = session();
    let err = run_in(&mut interpreter, "print(missing);").unwrap_err();

    assert_eq!(err.to_string(), "Undefined variable to retrieve missing.\n[line 1]");
    assert_eq!(failure("x = 1;"), RuntimeErrorType::UndefinedAssignment { name: "x".into() });
    assert_eq!(output("var a; print(a); var b = a = 3; print(a); print(b);"), "null\n3\n3\n");
    assert_eq!(output("var a = 1; a += 2; a -= 1; print(a);"), "2\n");
}

#[test]
fn test_compound_assignment_evaluates_target_twice() {
    let src = "
        var calls = 0;
        var o = { var x = 1; };
        fun get() { calls += 1; return o; }
        get().x += 10;
        print(o.x);
        print(calls);
    ";

    assert_eq!(output(src), "11\n2\n");
}

#[test]
fn test_calls() {
    assert_eq!(failure("var a = 1; a();"), RuntimeErrorType::NotCallable);
    assert_eq!(failure("\"text\"(1);"), RuntimeErrorType::NotCallable);
    assert_eq!(failure("print();"), RuntimeErrorType::ArityMismatch { expected: 1, found: 0 });
    assert_eq!(output("fun f() {} print(f); print(print); print(print(1));"), "<fn f>\n<native fn>\n1\nnull\n");
    assert_eq!(output("var t = clock(); print(t > 0);"), "true\n");
}

#[test]
fn test_error_aborts_remaining_statements() {
    let (mut interpreter, out) = session();

    run_in(&mut interpreter, "print(1); 1 / 0; print(2);").unwrap_err();

    assert_eq!(out.take(), "1\n");
}

#[test]
fn test_objects() {
    let src = "
        var o = { var x = 1; fun get() { return 42; } };
        print(o.x);
        print(o.get());
        var p = o;
        p.x = 5;
        print(o.x);
        print(o);
        print(o[1]);
    ";

    assert_eq!(output(src), "1\n42\n5\n{get: <fn get>, x: 5}\n5\n");
}

#[test]
fn test_object_methods_close_over_declaring_scope() {
    let src = "
        var count = 10;
        fun make() {
            var count = 0;
            return { fun next() { count = count + 1; return count; } };
        }
        var c = make();
        c.next();
        print(c.next());
        print(count);
    ";

    assert_eq!(output(src), "2\n10\n");
}

#[test]
fn test_member_errors() {
    assert_eq!(
        failure("var o = {}; o.x = 1;"),
        RuntimeErrorType::UndefinedMember { member: "x".into(), owner: "o".into() }
    );
    assert_eq!(
        failure("var a = 1; a.x = 2;"),
        RuntimeErrorType::UnsupportedMemberAssignment { found: ValueType::Int }
    );
    assert_eq!(
        failure("var l = [1]; l.nope;"),
        RuntimeErrorType::UndefinedMember { member: "nope".into(), owner: "l".into() }
    );
    assert_eq!(failure("true.size;"), RuntimeErrorType::UnsupportedDotAccess { found: ValueType::Bool });
    assert_eq!(failure("null[0];"), RuntimeErrorType::UnsupportedIndexAccess { found: ValueType::Null });
}

#[test]
fn test_index_errors() {
    assert_eq!(
        failure("var l = [1]; l[1];"),
        RuntimeErrorType::IndexOutOfBounds { owner: "l".into(), index: 1, len: 1 }
    );
    assert_eq!(
        failure("var l = [1]; l[-1];"),
        RuntimeErrorType::IndexOutOfBounds { owner: "l".into(), index: -1, len: 1 }
    );
    assert_eq!(
        failure("var l = [1]; l[\"a\"];"),
        RuntimeErrorType::IndexNotInt { owner: "l".into(), index: "a".into() }
    );

    let (mut interpreter, _) = session();
    let err = run_in(&mut interpreter, "var l = [1]; l[1];").unwrap_err();

    assert_eq!(err.to_string(), "Index out of bounds l index 1, size is 1\n[line 1]");
}

#[test]
fn test_list_natives() {
    let src = r#"
        var l = [1];
        l.add(2);
        l.insert(0, 0);
        l.add_range(l);
        l.remove(1);
        l.remove(99);
        print(l);
        print(l.size);
        print("héllo".size);
        print(l.add(1));
    "#;

    assert_eq!(output(src), "[0, 2, 0, 1, 2]\n5\n5\nnull\n");
}

#[test]
fn test_list_native_errors() {
    assert_eq!(
        failure("var l = []; l.insert(1, 0);"),
        RuntimeErrorType::IndexOutOfBounds { owner: "list".into(), index: 1, len: 0 }
    );
    assert_eq!(
        failure("var l = []; l.add_range(1);"),
        RuntimeErrorType::InvalidArgument { function: "add_range", expected: ValueType::List, found: ValueType::Int }
    );
}

#[test]
fn test_methods_stay_bound_to_their_list() {
    assert_eq!(output("var l = []; var add = l.add; add(1); add(2); print(l);"), "[1, 2]\n");
}

#[test]
fn test_self_containing_list_prints() {
    assert_eq!(output("var l = []; l.add(l); print(l);"), "[[...]]\n");
}

#[test]
fn test_globals_persist_between_runs() {
    let (mut interpreter, out) = session();

    run_in(&mut interpreter, "var a = 1; fun inc() { a = a + 1; }").unwrap();
    run_in(&mut interpreter, "inc(); print(a);").unwrap();

    assert_eq!(out.take(), "2\n");
}

#[test]
fn test_deeply_nested_grouping_evaluates() {
    let src = format!("print({}1{});", "(".repeat(3000), ")".repeat(3000));

    assert_eq!(output(&src), "1\n");
}

#[test]
fn test_deeply_nested_list_prints() {
    let printed = output(
        "var l = []; var i = 0; while (i < 10000) { l = [l]; i = i + 1; } var s = \"\" + l; print(s.size);"
    );

    assert_eq!(printed, "20002\n");
}

#[test]
fn test_deeply_nested_list_is_released() {
    let (mut interpreter, out) = session();

    run_in(&mut interpreter, "var l = []; var i = 0; while (i < 50000) { l = [l]; i = i + 1; } print(i);").unwrap();
    drop(interpreter);

    assert_eq!(out.take(), "50000\n");
}
