pub mod arith;
pub mod inst;
pub mod segment;
pub mod writer;

pub use arith::Arith;
pub use inst::Inst;
pub use segment::Segment;
pub use writer::Writer;
