use crate::{arith::Arith, inst::Inst, segment::Segment};

/// Append-only instruction stream for one compiled unit.
/// Operands are written as given, without validation.
#[derive(Debug, Default)]
pub struct Writer {
    insts: Vec<Inst>,
}

impl Writer {
    pub fn new() -> Self {
        Self { insts: Vec::new() }
    }

    fn write(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    pub fn push(&mut self, seg: Segment, idx: u16) {
        self.write(Inst::Push(seg, idx))
    }

    pub fn pop(&mut self, seg: Segment, idx: u16) {
        self.write(Inst::Pop(seg, idx))
    }

    pub fn arith(&mut self, op: Arith) {
        self.write(Inst::Arith(op))
    }

    pub fn label(&mut self, label: &str) {
        self.write(Inst::Label(label.to_string()))
    }

    pub fn goto(&mut self, label: &str) {
        self.write(Inst::Goto(label.to_string()))
    }

    pub fn if_goto(&mut self, label: &str) {
        self.write(Inst::IfGoto(label.to_string()))
    }

    pub fn call(&mut self, name: &str, args: u16) {
        self.write(Inst::Call(name.to_string(), args))
    }

    pub fn function(&mut self, name: &str, locals: u16) {
        self.write(Inst::Function(name.to_string(), locals))
    }

    pub fn ret(&mut self) {
        self.write(Inst::Return)
    }

    pub fn last(&self) -> Option<&Inst> {
        self.insts.last()
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn into_insts(self) -> Vec<Inst> {
        self.insts
    }

    /// One instruction per line, newline terminated.
    pub fn render(&self) -> String {
        render(&self.insts)
    }
}

pub fn render(insts: &[Inst]) -> String {
    let mut out = String::new();
    for inst in insts {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emission_order() {
        let mut w = Writer::new();
        w.function("Main.main", 0);
        w.push(Segment::Constant, 1);
        w.push(Segment::Constant, 2);
        w.arith(Arith::Add);
        w.call("Output.printInt", 1);
        w.pop(Segment::Temp, 0);
        w.push(Segment::Constant, 0);
        w.ret();
        assert_eq!(
            w.render(),
            "function Main.main 0\n\
             push constant 1\n\
             push constant 2\n\
             add\n\
             call Output.printInt 1\n\
             pop temp 0\n\
             push constant 0\n\
             return\n"
        );
        assert!(w.last().map_or(false, Inst::is_return));
    }
}
