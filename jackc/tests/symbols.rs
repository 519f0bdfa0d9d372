use jackc::{Error, Kind, SymbolTable};
use vmcode::Segment;

#[test]
fn indices_per_kind() {
    let mut table = SymbolTable::new();
    table.define("a", "int", Kind::Static).unwrap();
    table.define("x", "int", Kind::Field).unwrap();
    table.define("y", "int", Kind::Field).unwrap();
    table.define("b", "Point", Kind::Static).unwrap();

    assert_eq!(table.index_of("a").unwrap(), 0);
    assert_eq!(table.index_of("b").unwrap(), 1);
    assert_eq!(table.index_of("x").unwrap(), 0);
    assert_eq!(table.index_of("y").unwrap(), 1);
    assert_eq!(table.var_count(Kind::Static), 2);
    assert_eq!(table.var_count(Kind::Field), 2);
    assert_eq!(table.type_of("b").unwrap(), "Point");
}

#[test]
fn locals_are_contiguous() {
    let mut table = SymbolTable::new();
    table.start_subroutine();
    for i in 0..5 {
        table.define(&format!("v{}", i), "int", Kind::Local).unwrap();
    }
    for i in 0..5 {
        assert_eq!(table.index_of(&format!("v{}", i)).unwrap(), i);
    }
    assert_eq!(table.var_count(Kind::Local), 5);
}

#[test]
fn start_subroutine_resets_only_subroutine_scope() {
    let mut table = SymbolTable::new();
    table.define("count", "int", Kind::Static).unwrap();
    table.define("size", "int", Kind::Field).unwrap();
    table.start_subroutine();
    table.define("n", "int", Kind::Argument).unwrap();
    table.define("i", "int", Kind::Local).unwrap();

    table.start_subroutine();
    assert_eq!(table.var_count(Kind::Argument), 0);
    assert_eq!(table.var_count(Kind::Local), 0);
    assert_eq!(table.var_count(Kind::Static), 1);
    assert_eq!(table.var_count(Kind::Field), 1);
    assert!(table.lookup("n").is_none());
    assert!(table.lookup("i").is_none());
    assert_eq!(table.kind_of("size").unwrap(), Kind::Field);
}

#[test]
fn subroutine_scope_shadows_class_scope() {
    let mut table = SymbolTable::new();
    table.define("x", "int", Kind::Field).unwrap();
    table.start_subroutine();
    table.define("x", "char", Kind::Local).unwrap();

    let x = table.lookup("x").unwrap();
    assert_eq!(x.kind, Kind::Local);
    assert_eq!(x.ty, "char");
    assert_eq!(x.segment(), Segment::Local);

    table.start_subroutine();
    assert_eq!(table.lookup("x").unwrap().segment(), Segment::This);
}

#[test]
fn last_definition_wins() {
    let mut table = SymbolTable::new();
    table.start_subroutine();
    table.define("a", "int", Kind::Local).unwrap();
    assert!(table.is_defined_in_scope("a", Kind::Local));
    assert!(!table.is_defined_in_scope("a", Kind::Static));

    table.define("a", "boolean", Kind::Local).unwrap();
    assert_eq!(table.type_of("a").unwrap(), "boolean");
    assert_eq!(table.index_of("a").unwrap(), 1);
    assert_eq!(table.var_count(Kind::Local), 2);
}

#[test]
fn unknown_name() {
    let table = SymbolTable::new();
    match table.index_of("ghost") {
        Err(Error::UndefinedSymbol { name, pos: None }) => assert_eq!(name, "ghost"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(table.kind_of("ghost").is_err());
    assert_eq!(table.type_of("ghost").unwrap_err().category(), "symbol");
}

#[test]
fn segments() {
    assert_eq!(Kind::Static.segment(), Segment::Static);
    assert_eq!(Kind::Field.segment(), Segment::This);
    assert_eq!(Kind::Argument.segment(), Segment::Argument);
    assert_eq!(Kind::Local.segment(), Segment::Local);
}

#[test]
fn index_space_exhausted() {
    let mut table = SymbolTable::new();
    table.start_subroutine();
    for _ in 0..u16::MAX {
        table.define("v", "int", Kind::Local).unwrap();
    }
    assert_eq!(table.index_of("v").unwrap(), u16::MAX - 1);

    match table.define("w", "int", Kind::Local) {
        Err(Error::TooMany { what, name, pos: None }) => {
            assert_eq!(what, "local variables");
            assert_eq!(name, "w");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(table.var_count(Kind::Local), u16::MAX);
    assert!(table.lookup("w").is_none());

    // Other kinds keep their own counters
    table.define("n", "int", Kind::Argument).unwrap();
    assert_eq!(table.index_of("n").unwrap(), 0);
}
