use strum::{Display, EnumString};

/// Stack arithmetic/logic commands understood natively by the VM.
/// Multiplication and division are not among them; they are library calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Arith {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[test]
fn test() {
    assert_eq!(Arith::Neg.to_string(), "neg");
    assert_eq!("lt".parse::<Arith>(), Ok(Arith::Lt));
    assert!("mul".parse::<Arith>().is_err());
}
