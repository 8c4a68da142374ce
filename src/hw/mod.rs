//! Register-level encoding of the command stream.

pub mod disasm;
pub mod emit;
pub mod regs;

pub use disasm::{Record, disassemble, listing};
pub use emit::{DestTarget, FilterWindow, LayerOp, SourceLayer};
pub use regs::Command;
