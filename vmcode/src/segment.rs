use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(seg) => Ok(seg),
            Err(_) => Err(format!("Unknown segment name: {s}")),
        }
    }
}

#[test]
fn test() {
    assert_eq!(Segment::This.to_string(), "this");
    assert_eq!(Segment::parse("pointer"), Ok(Segment::Pointer));
    assert!(Segment::parse("heap").is_err());
}
