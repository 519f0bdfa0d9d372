use crate::{arith::Arith, segment::Segment};

use color_print::cformat;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(Arith),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Push(seg, idx) => write!(f, "push {} {}", seg, idx),
            Inst::Pop(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Inst::Arith(op) => write!(f, "{}", op),
            Inst::Label(label) => write!(f, "label {}", label),
            Inst::Goto(label) => write!(f, "goto {}", label),
            Inst::IfGoto(label) => write!(f, "if-goto {}", label),
            Inst::Function(name, locals) => write!(f, "function {} {}", name, locals),
            Inst::Call(name, args) => write!(f, "call {} {}", name, args),
            Inst::Return => write!(f, "return"),
        }
    }
}

impl Inst {
    pub fn is_return(&self) -> bool {
        matches!(self, Inst::Return)
    }

    pub fn cformat(&self) -> String {
        macro_rules! mem {
            ($name:expr, $seg:expr, $idx:expr) => {
                cformat!("<r>{:<9}</><b>{:<9}</><y>{}</>", $name, $seg, $idx)
            };
        }

        macro_rules! ctl {
            ($name:expr, $target:expr) => {
                cformat!("<r>{:<9}</><g>{}</>", $name, $target)
            };
        }

        match self {
            Inst::Push(seg, idx) => mem!("push", seg, idx),
            Inst::Pop(seg, idx) => mem!("pop", seg, idx),
            Inst::Arith(op) => cformat!("<r>{}</>", op),
            Inst::Label(label) => cformat!("<m>{}</>:", label),
            Inst::Goto(label) => ctl!("goto", label),
            Inst::IfGoto(label) => ctl!("if-goto", label),
            Inst::Function(name, locals) => {
                cformat!("<r,s>{:<9}</><g,s>{}</> <y>{}</>", "function", name, locals)
            }
            Inst::Call(name, args) => cformat!("<r>{:<9}</><g>{}</> <y>{}</>", "call", name, args),
            Inst::Return => cformat!("<r>return</>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_inst {
        ($($name:ident: $inst:expr => $text:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($inst.to_string(), $text);
                }
            )*
        }
    }

    test_inst! {
        test_push: Inst::Push(Segment::Constant, 7) => "push constant 7",
        test_pop: Inst::Pop(Segment::That, 0) => "pop that 0",
        test_pop_field: Inst::Pop(Segment::This, 2) => "pop this 2",
        test_add: Inst::Arith(Arith::Add) => "add",
        test_neg: Inst::Arith(Arith::Neg) => "neg",
        test_label: Inst::Label("WHILE_TOP_0".into()) => "label WHILE_TOP_0",
        test_goto: Inst::Goto("IF_END_1".into()) => "goto IF_END_1",
        test_if_goto: Inst::IfGoto("IF_ELSE_0".into()) => "if-goto IF_ELSE_0",
        test_function: Inst::Function("Main.main".into(), 2) => "function Main.main 2",
        test_call: Inst::Call("Math.multiply".into(), 2) => "call Math.multiply 2",
        test_return: Inst::Return => "return",
    }
}
