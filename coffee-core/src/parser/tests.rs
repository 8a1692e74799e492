use pretty_assertions::assert_eq;

use crate::{
    lexer::prelude::{tokenize, TokenKind},
    parser::prelude::{parse, parse_source, Expression, Outcome, Parsed, Primitive, Statement}
};

fn parse_ok(src: &str) -> Parsed {
    match parse_source(src) {
        Outcome::Ok(parsed) => parsed,
        Outcome::PartialFailure(_, errors) => panic!("unexpected errors: {errors:#?}")
    }
}

fn parse_errors(src: &str) -> (Parsed, Vec<String>) {
    match parse_source(src) {
        Outcome::Ok(parsed) => panic!("expected errors, got {parsed}"),
        Outcome::PartialFailure(parsed, errors) => {
            (parsed, errors.iter().map(|err| err.to_string()).collect())
        }
    }
}

fn canonical(src: &str) -> String {
    parse_ok(src).to_string()
}

#[test]
fn test_precedence() {
    assert_eq!(canonical("1 + 2 * 3;"), "(1 + (2 * 3));");
    assert_eq!(canonical("(1 + 2) * 3;"), "(((1 + 2)) * 3);");
    assert_eq!(canonical("a or b and c == d < e + f;"), "(a or (b and (c == (d < (e + f)))));");
    assert_eq!(canonical("10 % 3 / 2;"), "((10 % 3) / 2);");
}

#[test]
fn test_left_associativity() {
    assert_eq!(canonical("1 - 2 - 3;"), "((1 - 2) - 3);");
    assert_eq!(canonical("a != b == c;"), "((a != b) == c);");
}

#[test]
fn test_assignment_is_right_associative() {
    let parsed = parse_ok("a = b = 1;");

    assert_eq!(parsed.to_string(), "a = b = 1;");

    match &parsed.statements[0] {
        Statement::Expression(Expression::Assign { target, value }) => {
            assert!(matches!(target.as_ref(), Expression::Variable { name } if name.lexeme == "a"));
            assert!(matches!(value.as_ref(), Expression::Assign { .. }));
        },
        other => panic!("expected assignment, got {other:?}")
    }
}

#[test]
fn test_unary() {
    assert_eq!(canonical("!!x;"), "(!(!x));");
    assert_eq!(canonical("--1;"), "(-(-1));");
    assert_eq!(canonical("-a * b;"), "((-a) * b);");
}

#[test]
fn test_postfix_chain() {
    let parsed = parse_ok("f()[0].x(1);");

    assert_eq!(parsed.to_string(), "f()[0].x(1);");

    let Statement::Expression(Expression::Call(call)) = &parsed.statements[0] else {
        panic!("expected call, got {:?}", parsed.statements[0]);
    };

    assert_eq!(call.args.len(), 1);

    let Expression::Access { left, member, .. } = call.callee.as_ref() else {
        panic!("expected access, got {:?}", call.callee);
    };

    assert_eq!(member.lexeme, "x");

    let Expression::Binary(index) = left.as_ref() else {
        panic!("expected index, got {left:?}");
    };

    assert!(index.is_index());
    assert!(matches!(index.left.as_ref(), Expression::Call(_)));
}

#[test]
fn test_literals() {
    assert_eq!(canonical("var s = \"hi\"; var n = null; var l = [1, true, []];"),
        "var s = \"hi\";\nvar n = null;\nvar l = [1, true, []];");

    let parsed = parse_ok("VAR x = TRUE;");

    assert_eq!(parsed.to_string(), "var x = true;");
    assert!(matches!(
        &parsed.statements[0],
        Statement::Var { initializer: Some(Expression::Literal { value: Primitive::Bool(true), .. }), .. }
    ));
}

#[test]
fn test_invalid_assignment_target() {
    let (parsed, errors) = parse_errors("1 = 2;");

    assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
    assert_eq!(parsed.to_string(), "1;");

    let (_, errors) = parse_errors("l[0] = 2;");

    assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
}

#[test]
fn test_member_assignment() {
    assert_eq!(canonical("o.a.b = 1;"), "o.a.b = 1;");
}

#[test]
fn test_compound_assignment() {
    assert_eq!(canonical("x += 2;"), "x = (x + 2);");
    assert_eq!(canonical("o.n -= 1;"), "o.n = (o.n - 1);");

    let (_, errors) = parse_errors("1 += 2;");

    assert_eq!(errors, vec!["[line 1] Error at '+=': Invalid assignment target."]);
}

#[test]
fn test_object_or_block() {
    let parsed = parse_ok("{ var a = 1; }");

    assert!(matches!(&parsed.statements[0], Statement::Block(body) if body.len() == 1));

    let parsed = parse_ok("var o = { var a = 1; fun f() { return a; } };");

    assert_eq!(parsed.to_string(), "var o = { var a = 1; fun f() { return a; } };");

    match &parsed.statements[0] {
        Statement::Var { initializer: Some(Expression::Object(object)), .. } => {
            assert_eq!(object.declarations.len(), 2);
            assert!(matches!(object.declarations[1], Statement::Function(_)));
        },
        other => panic!("expected object literal, got {other:?}")
    }

    assert_eq!(canonical("var e = {};"), "var e = {};");
}

#[test]
fn test_object_only_allows_declarations() {
    let (_, errors) = parse_errors("var o = { print(1); };");

    assert_eq!(errors[0], "[line 1] Error at 'print': Expect 'var' or 'fun' declaration inside object.");
}

#[test]
fn test_recovers_multiple_errors() {
    let (parsed, errors) = parse_errors("var = 1;\nprint(1;\nvar ok = 2;");

    assert_eq!(
        errors,
        vec![
            "[line 1] Error at '=': Expect variable name.",
            "[line 2] Error at ';': Expect ')' after arguments.",
        ]
    );
    assert_eq!(parsed.to_string(), "var ok = 2;");
}

#[test]
fn test_recovers_inside_block() {
    let (parsed, errors) = parse_errors("{ var = 1; var y = 2; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(parsed.to_string(), "{ var y = 2; }");
}

#[test]
fn test_error_at_end() {
    let (_, errors) = parse_errors("print(1)");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after expression."]);

    let (_, errors) = parse_errors("1 +");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect expression."]);
}

#[test]
fn test_member_must_be_identifier() {
    let (_, errors) = parse_errors("a.1;");

    assert_eq!(errors, vec!["[line 1] Error at '1': Expect property name after '.'."]);
}

#[test]
fn test_integer_out_of_range() {
    let (_, errors) = parse_errors("99999999999999999999;");

    assert_eq!(errors, vec!["[line 1] Error at '99999999999999999999': Integer literal is out of range."]);
}

#[test]
fn test_for_desugars_to_while() {
    assert_eq!(
        canonical("for (var i = 0; i < 3; i = i + 1) print(i);"),
        "{ var i = 0; while ((i < 3)) { print(i); i = (i + 1); } }"
    );
    assert_eq!(canonical("for (;;) x;"), "while (true) x;");
    assert_eq!(canonical("for (i = 0; i < 1;) {}"), "{ i = 0; while ((i < 1)) { } }");
}

#[test]
fn test_if_while() {
    assert_eq!(
        canonical("if (a) b; else { c; } while (x) x = x - 1;"),
        "if (a) b; else { c; }\nwhile (x) x = (x - 1);"
    );
}

#[test]
fn test_top_level_return() {
    let (_, errors) = parse_errors("return 1;");

    assert_eq!(errors, vec!["[line 1] Error at 'return': Can't return from top-level code."]);

    parse_ok("fun f() { if (true) return 1; return; }");
    parse_ok("var o = { fun m() { return 1; } };");
}

#[test]
fn test_parameter_limit() {
    let params = (0..256)
        .map(|idx| format!("p{idx}"))
        .collect::<Vec<String>>()
        .join(", ");

    let (parsed, errors) = parse_errors(&format!("fun f({params}) {{}}"));

    assert_eq!(errors, vec!["[line 1] Error at 'p255': Can't have more than 255 parameters."]);

    match &parsed.statements[0] {
        Statement::Function(function) => assert_eq!(function.arity(), 256),
        other => panic!("expected function, got {other:?}")
    }
}

#[test]
fn test_trivia_is_skipped() {
    let parsed = parse_ok("// hi\nvar x = 1 @ ; /* done */");

    assert_eq!(parsed.to_string(), "var x = 1;");
    assert_eq!(parsed.comments.len(), 2);
}

#[test]
fn test_parse_is_deterministic() {
    let src = "fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }";

    let first = parse(tokenize(src));
    let second = parse(tokenize(src));

    match (first, second) {
        (Outcome::Ok(first), Outcome::Ok(second)) => assert_eq!(first, second),
        _ => panic!("expected both parses to succeed")
    }
}

#[test]
fn test_tokens_keep_lines() {
    let parsed = parse_ok("var a;\n\nvar b;");

    match &parsed.statements[1] {
        Statement::Var { name, .. } => {
            assert_eq!(name.line, 3);
            assert_eq!(name.kind, TokenKind::Identifier);
        },
        other => panic!("expected var, got {other:?}")
    }
}

const DEEP: usize = 3000;

#[test]
fn test_deeply_nested_groupings() {
    let src = format!("{}1{};", "(".repeat(DEEP), ")".repeat(DEEP));

    assert_eq!(canonical(&src), src);
}

#[test]
fn test_deeply_nested_unary() {
    let parsed = parse_ok(&format!("{}1;", "-".repeat(DEEP)));

    let mut depth = 0;
    let mut expression = match &parsed.statements[..] {
        [Statement::Expression(expression)] => expression,
        other => panic!("unexpected program {other:?}")
    };

    while let Expression::Unary { operand, .. } = expression {
        depth += 1;
        expression = operand;
    }

    assert_eq!(depth, DEEP);
}

#[test]
fn test_deeply_nested_blocks() {
    let src = format!("{}{}", "{".repeat(DEEP), "}".repeat(DEEP));
    let expected = format!("{}{{ }}{}", "{ ".repeat(DEEP - 1), " }".repeat(DEEP - 1));

    assert_eq!(canonical(&src), expected);
}

#[test]
fn test_deeply_nested_ifs() {
    let parsed = parse_ok(&format!("{}print(1);", "if (true) ".repeat(DEEP)));

    assert_eq!(parsed.statements.len(), 1);
}
