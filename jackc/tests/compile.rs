use jackc::grammer::token::{Keyword, TokenKind};
use jackc::trace::{Recorder, Rule};
use jackc::{Compiler, Error, Lexer, TokenStream};

fn compile(code: &str) -> Vec<String> {
    println!("{code}");
    let class = match jackc::compile(code) {
        Ok(class) => class,
        Err(e) => panic!("{}", e),
    };
    let lines: Vec<String> = class.insts.iter().map(|inst| inst.to_string()).collect();
    for (idx, line) in lines.iter().enumerate() {
        println!("{:>3}: {}", idx, line);
    }
    lines
}

fn fails(code: &str) -> Error {
    match jackc::compile(code) {
        Ok(class) => panic!("expected an error, got {:?}", class.insts),
        Err(e) => {
            println!("{}", e);
            e
        }
    }
}

fn assert(code: &str, expect: &[&str]) {
    assert_eq!(compile(code), expect);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($line:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, &[$($line),*]);
        }
    };
}

// ---- Subroutines ----
case!(
    print_string,
    "class Main { function void main() { do Output.printString(\"Hi\"); return; } }",
    [
        "function Main.main 0",
        "push constant 2",
        "call String.new 1",
        "push constant 72",
        "call String.appendChar 2",
        "push constant 105",
        "call String.appendChar 2",
        "call Output.printString 1",
        "pop temp 0",
        "push constant 0",
        "return",
    ]
);

case!(
    empty_body,
    "class Foo { function void sub() { } }",
    ["function Foo.sub 0", "push constant 0", "return"]
);

case!(
    empty_string,
    "class Foo { function String s() { return \"\"; } }",
    ["function Foo.s 0", "push constant 0", "call String.new 1", "return"]
);

case!(
    locals_counted,
    "class Foo { function int f(int a, int b) { var int x, y; var boolean z; let z = true; return b; } }",
    [
        "function Foo.f 3",
        "push constant 0",
        "not",
        "pop local 2",
        "push argument 1",
        "return",
    ]
);

case!(
    point,
    "class Point {
        field int x, y;
        static int count;

        constructor Point new(int ax, int ay) {
            let x = ax;
            let y = ay;
            let count = count + 1;
            return this;
        }

        method int getX() { return x; }

        method int dist(Point other) {
            return Math.abs(x - other.getX()) + distY(other);
        }

        method int distY(Point other) { return y; }
    }",
    [
        "function Point.new 0",
        "push constant 2",
        "call Memory.alloc 1",
        "pop pointer 0",
        "push argument 0",
        "pop this 0",
        "push argument 1",
        "pop this 1",
        "push static 0",
        "push constant 1",
        "add",
        "pop static 0",
        "push pointer 0",
        "return",
        "function Point.getX 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "return",
        "function Point.dist 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "push argument 1",
        "call Point.getX 1",
        "sub",
        "call Math.abs 1",
        "push pointer 0",
        "push argument 1",
        "call Point.distY 2",
        "add",
        "return",
        "function Point.distY 0",
        "push argument 0",
        "pop pointer 0",
        "push this 1",
        "return",
    ]
);

case!(
    void_method_implicit_return,
    "class Box { field int n; method void inc() { let n = n + 1; } }",
    [
        "function Box.inc 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "push constant 1",
        "add",
        "pop this 0",
        "push constant 0",
        "return",
    ]
);

// ---- Calls ----
case!(
    call_unknown_qualifier_is_class,
    "class Main { function void main() { do Screen.clear(); return; } }",
    [
        "function Main.main 0",
        "call Screen.clear 0",
        "pop temp 0",
        "push constant 0",
        "return",
    ]
);

case!(
    call_through_local,
    "class Main { function void main() { var Game g; let g = Game.new(3, 4); do g.run(1); return; } }",
    [
        "function Main.main 1",
        "push constant 3",
        "push constant 4",
        "call Game.new 2",
        "pop local 0",
        "push local 0",
        "push constant 1",
        "call Game.run 2",
        "pop temp 0",
        "push constant 0",
        "return",
    ]
);

case!(
    variable_shadows_class_name,
    "class Main { function void main() { var Sys Output; do Output.println(); return; } }",
    [
        "function Main.main 1",
        "push local 0",
        "call Sys.println 1",
        "pop temp 0",
        "push constant 0",
        "return",
    ]
);

// ---- Expressions ----
case!(
    left_to_right,
    "class Main { function int f() { return 1 + 2 * 3; } }",
    [
        "function Main.f 0",
        "push constant 1",
        "push constant 2",
        "add",
        "push constant 3",
        "call Math.multiply 2",
        "return",
    ]
);

case!(
    parenthesized,
    "class Main { function int f() { return 1 + (2 * 3); } }",
    [
        "function Main.f 0",
        "push constant 1",
        "push constant 2",
        "push constant 3",
        "call Math.multiply 2",
        "add",
        "return",
    ]
);

case!(
    operators,
    "class Main { function boolean f(int a, int b) { return ((a / b) = (a & b)) | (a < b) | (a > -b); } }",
    [
        "function Main.f 0",
        "push argument 0",
        "push argument 1",
        "call Math.divide 2",
        "push argument 0",
        "push argument 1",
        "and",
        "eq",
        "push argument 0",
        "push argument 1",
        "lt",
        "or",
        "push argument 0",
        "push argument 1",
        "neg",
        "gt",
        "or",
        "return",
    ]
);

case!(
    keyword_constants,
    "class Main { function void f() { var boolean b; var Main m; let b = ~false; let m = null; return; } }",
    [
        "function Main.f 2",
        "push constant 0",
        "not",
        "pop local 0",
        "push constant 0",
        "pop local 1",
        "push constant 0",
        "return",
    ]
);

// ---- Arrays ----
case!(
    array_increment,
    "class Main { function void main() { var Array a; var int i; let a[i] = a[i] + 1; return; } }",
    [
        "function Main.main 2",
        "push local 1",
        "push local 0",
        "add",
        "push local 1",
        "push local 0",
        "add",
        "pop pointer 1",
        "push that 0",
        "push constant 1",
        "add",
        "pop temp 0",
        "pop pointer 1",
        "push temp 0",
        "pop that 0",
        "push constant 0",
        "return",
    ]
);

// ---- Control flow ----
case!(
    while_loop,
    "class Main {
        function int sum(int n) {
            var int s;
            let s = 0;
            while (n > 0) {
                let s = s + n;
                let n = n - 1;
            }
            return s;
        }
    }",
    [
        "function Main.sum 1",
        "push constant 0",
        "pop local 0",
        "label WHILE_TOP_0",
        "push argument 0",
        "push constant 0",
        "gt",
        "not",
        "if-goto WHILE_END_1",
        "push local 0",
        "push argument 0",
        "add",
        "pop local 0",
        "push argument 0",
        "push constant 1",
        "sub",
        "pop argument 0",
        "goto WHILE_TOP_0",
        "label WHILE_END_1",
        "push local 0",
        "return",
    ]
);

case!(
    nested_if,
    "class Main {
        function void main() {
            var int x;
            if (x) {
                if (x) { let x = 1; }
            } else {
                let x = 2;
            }
            return;
        }
    }",
    [
        "function Main.main 1",
        "push local 0",
        "not",
        "if-goto IF_ELSE_0",
        "push local 0",
        "not",
        "if-goto IF_ELSE_2",
        "push constant 1",
        "pop local 0",
        "label IF_ELSE_2",
        "goto IF_END_1",
        "label IF_ELSE_0",
        "push constant 2",
        "pop local 0",
        "label IF_END_1",
        "push constant 0",
        "return",
    ]
);

#[test]
fn labels_unique_per_subroutine() {
    let lines = compile(
        "class Main {
            function void main() {
                var int i;
                while (i < 3) {
                    if (i = 0) { let i = 1; } else { if (i = 1) { let i = 2; } }
                    while (i > 5) { let i = i - 1; }
                }
                if (i) { } else { }
                return;
            }
        }",
    );
    let mut labels: Vec<&String> = lines.iter().filter(|l| l.starts_with("label ")).collect();
    let total = labels.len();
    assert_eq!(total, 9);
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), total);
}

#[test]
fn labels_restart_in_each_subroutine() {
    let lines = compile(
        "class Main {
            function void a() { while (true) { } return; }
            function void b() { while (true) { } return; }
        }",
    );
    let tops = lines.iter().filter(|l| *l == "label WHILE_TOP_0").count();
    assert_eq!(tops, 2);
}

// ---- Errors ----
#[test]
fn undefined_variable() {
    match fails("class Main { function void main() { let y = 1; return; } }") {
        Error::UndefinedSymbol { name, pos: Some(pos) } => {
            assert_eq!(name, "y");
            assert_eq!((pos.row, pos.col), (1, 41));
        }
        e => panic!("unexpected {:?}", e),
    }
}

#[test]
fn undefined_in_expression() {
    let e = fails("class Main {\n  function int f() {\n    return ghost + 1;\n  }\n}");
    assert_eq!(e.category(), "symbol");
    assert_eq!(e.pos().map(|p| (p.row, p.col)), Some((3, 12)));
}

#[test]
fn unqualified_call_in_method() {
    let lines = compile("class Main { method void a() { do b(); return; } method void b() { return; } }");
    assert_eq!(lines[3], "push pointer 0");
    assert_eq!(lines[4], "call Main.b 1");
}

#[test]
fn missing_equal() {
    match fails("class Main { function void main() { var int x; let x 1; } }") {
        Error::UnexpectedToken { expected, found } => {
            assert_eq!(expected, "'='");
            assert_eq!(found.kind, TokenKind::Int(1));
        }
        e => panic!("unexpected {:?}", e),
    }
}

#[test]
fn keyword_is_not_a_name() {
    match fails("class class { }") {
        Error::UnexpectedToken { found, .. } => {
            assert_eq!(found.kind, TokenKind::Keyword(Keyword::Class));
            assert_eq!((found.pos.row, found.pos.col), (1, 7));
        }
        e => panic!("unexpected {:?}", e),
    }
}

#[test]
fn bad_term() {
    let e = fails("class Main { function void main() { var int x; let x = ; } }");
    assert!(matches!(e, Error::UnexpectedToken { ref expected, .. } if expected == "term"));
    assert_eq!(e.category(), "parse");
}

#[test]
fn unknown_statement() {
    let e = fails("class Main { function void main() { foo(); } }");
    assert!(matches!(e, Error::UnexpectedToken { ref expected, .. } if expected == "'}'"));
}

#[test]
fn unexpected_end() {
    let e = fails("class Main {");
    assert!(matches!(e, Error::UnexpectedEOF { .. }));
    assert_eq!(e.category(), "parse");
}

#[test]
fn trailing_class() {
    let e = fails("class A { } class B { }");
    assert!(matches!(e, Error::TrailingToken(ref info) if info.pos.col == 13));
}

#[test]
fn lex_error_aborts() {
    let e = fails("class A { function void f() { return 40000; } }");
    assert_eq!(e.category(), "lex");
}

#[test]
fn string_char_out_of_range() {
    let e = fails("class Main { function void main() { do Output.printString(\"\u{1F600}\u{9000}\"); return; } }");
    assert!(matches!(e, Error::StringCharOutOfRange('\u{1F600}', _)));
    assert_eq!(e.category(), "lex");
}

#[test]
fn string_constant_checked_on_emit() {
    let code = "class Main { function void main() { do Output.printString(\"Hi\"); return; } }";
    let mut tokens = Lexer::new(code).parse().unwrap();
    for token in tokens.iter_mut() {
        if let TokenKind::Str(text) = &mut token.kind {
            *text = format!("\u{9000}");
        }
    }
    match Compiler::new(TokenStream::new(tokens)).compile() {
        Err(Error::StringCharOutOfRange('\u{9000}', pos)) => assert_eq!(pos.col, 59),
        other => panic!("unexpected {:?}", other.map(|c| c.insts)),
    }
}

#[test]
fn string_char_limit() {
    let lines = compile("class Main { function void main() { do Output.printString(\"\u{7FFF}\"); return; } }");
    assert_eq!(lines[1], "push constant 1");
    assert_eq!(lines[3], "push constant 32767");
}

// ---- Argument counts ----
fn call_with(callee: &str, args: usize) -> String {
    let list = vec!["0"; args].join(",");
    format!("class Main {{ method void main() {{ do {callee}({list}); return; }} }}")
}

#[test]
fn most_arguments() {
    let lines = compile(&call_with("Math.max", 65535));
    assert_eq!(lines[lines.len() - 4], "call Math.max 65535");
}

#[test]
fn too_many_arguments() {
    match fails(&call_with("Math.max", 65536)) {
        Error::TooMany { what, name, pos: Some(_) } => {
            assert_eq!(what, "arguments");
            assert_eq!(name, "Math.max");
        }
        other => panic!("unexpected {:?}", other),
    }

    // The receiver counts as an argument too
    let e = fails(&call_with("run", 65535));
    assert!(matches!(e, Error::TooMany { ref name, .. } if name == "Main.run"));
    assert_eq!(e.category(), "symbol");
}

// ---- Redeclaration ----
const TWICE: &str = "class A { field int x; field boolean x; method boolean get() { return x; } }";

#[test]
fn redeclared_last_wins() {
    let lines = compile(TWICE);
    assert!(lines.contains(&"push this 1".to_string()));
}

#[test]
fn redeclared_strict() {
    let tokens = jackc::tokenize(TWICE).unwrap();
    match Compiler::new(tokens).strict(true).compile() {
        Err(Error::Redeclared { name, pos: Some(pos) }) => {
            assert_eq!(name, "x");
            assert_eq!(pos.col, 38);
        }
        other => panic!("unexpected {:?}", other.map(|c| c.insts)),
    }
}

#[test]
fn strict_allows_shadowing() {
    let code = "class A { field int x; method int f(int x) { var int y; return x + y; } }";
    let tokens = jackc::tokenize(code).unwrap();
    assert!(Compiler::new(tokens).strict(true).compile().is_ok());
}

// ---- Trace ----
#[test]
fn trace_productions() {
    let tokens = jackc::tokenize("class A { function int f() { return 1; } }").unwrap();
    let mut recorder = Recorder::new();
    let class = Compiler::new(tokens).hook(&mut recorder).compile().unwrap();
    assert_eq!(class.name, "A");

    assert_eq!(
        recorder.entered(),
        vec![
            Rule::Class,
            Rule::SubroutineDec,
            Rule::ParameterList,
            Rule::SubroutineBody,
            Rule::Statements,
            Rule::ReturnStatement,
            Rule::Expression,
            Rule::Term,
        ]
    );
    assert_eq!(recorder.events.len(), 16);
    let yaml = recorder.to_yaml().unwrap();
    assert!(yaml.contains("subroutineBody"));
}

#[test]
fn class_symbols_listed() {
    let class = jackc::compile("class A { static int n; field char c, d; }").unwrap();
    let names: Vec<_> = class.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["n", "c", "d"]);
    assert!(class.insts.is_empty());
}
