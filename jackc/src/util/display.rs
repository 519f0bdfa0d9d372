use color_print::cprintln;

use crate::compile::Class;
use crate::error::Error;
use vmcode::Inst;

/// Print error with diagnostic information showing file location and line content
pub fn print_diag(err: &Error, file: &str, code: &str) {
    cprintln!("<red,bold>error[{}]</>: {}", err.category(), err);

    let pos = match err.pos() {
        Some(pos) => pos,
        None => {
            cprintln!("     <blue>--></> <underline>{}</>", file);
            return;
        }
    };
    cprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
    cprintln!("      <blue>|</>");

    let line = code.lines().nth(pos.row.saturating_sub(1)).unwrap_or("");
    cprintln!(" <blue>{:>4} |</> {}", pos.row, line);
    let pad = " ".repeat(pos.col.saturating_sub(1));
    cprintln!("      <blue>|</> {}<red,bold>^</>", pad);
}

/// Class layout and the emitted code, one instruction per line.
pub fn print_class(class: &Class) {
    println!("+-[{}]-{}", class.name, "-".repeat(60usize.saturating_sub(class.name.len())));
    for symbol in &class.symbols {
        cprintln!(
            "| <cyan>{:<7}</> <y>{:>3}</> : {} <b>{}</>",
            symbol.kind.to_string(),
            symbol.index,
            symbol.ty,
            symbol.name
        );
    }
    if !class.symbols.is_empty() {
        println!("+{}", "-".repeat(64));
    }

    for inst in &class.insts {
        match inst {
            Inst::Function(..) => cprintln!("| {}", inst.cformat()),
            Inst::Label(_) => cprintln!("|  {}", inst.cformat()),
            _ => cprintln!("|     {}", inst.cformat()),
        }
    }
    println!("+{}", "-".repeat(64));
}
