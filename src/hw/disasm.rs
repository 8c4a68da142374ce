use std::fmt;

use crate::foundation::core::Rect;
use crate::foundation::error::{BlitError, BlitResult};
use crate::hw::regs::{self, AlphaModes, Command, FilterConfig, RotationConfig, SurfaceConfig};

/// One decoded command record. `offset` is the word index of its header.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Record {
    LoadState {
        offset: usize,
        reg: u16,
        values: Vec<u32>,
    },
    StartDe {
        offset: usize,
        rects: Vec<Rect>,
    },
    Nop {
        offset: usize,
    },
    End {
        offset: usize,
    },
}

impl Record {
    /// First register of a LOAD_STATE record.
    pub fn reg(&self) -> Option<u16> {
        match self {
            Self::LoadState { reg, .. } => Some(*reg),
            _ => None,
        }
    }

    /// Value loaded into `reg` by this record, if it covers it.
    pub fn value_of(&self, reg: u16) -> Option<u32> {
        match self {
            Self::LoadState {
                reg: base, values, ..
            } if reg >= *base => values.get(usize::from(reg - base)).copied(),
            _ => None,
        }
    }
}

/// Decode a command buffer into records.
pub fn disassemble(words: &[u32]) -> BlitResult<Vec<Record>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let header = words[i];
        match regs::opcode(header) {
            regs::OP_LOAD_STATE => {
                let (reg, count) = regs::load_state_fields(header);
                let end = i + 1 + count;
                if count == 0 || end > words.len() {
                    return Err(truncated(i, "LOAD_STATE"));
                }
                out.push(Record::LoadState {
                    offset: i,
                    reg,
                    values: words[i + 1..end].to_vec(),
                });
                i += (1 + count).next_multiple_of(2);
            }
            regs::OP_START_DE => {
                let count = regs::start_de_count(header);
                let end = i + 2 + 2 * count;
                if end > words.len() {
                    return Err(truncated(i, "START_DE"));
                }
                let rects = words[i + 2..end]
                    .chunks_exact(2)
                    .map(|pair| {
                        let (l, t) = regs::unpack_xy(pair[0]);
                        let (r, b) = regs::unpack_xy(pair[1]);
                        Rect::from_edges(l, t, r, b)
                    })
                    .collect();
                out.push(Record::StartDe { offset: i, rects });
                i = end;
            }
            regs::OP_NOP => {
                out.push(Record::Nop { offset: i });
                i += 1;
            }
            regs::OP_END => {
                out.push(Record::End { offset: i });
                i += 1;
            }
            op => {
                return Err(BlitError::invalid_argument(format!(
                    "unknown opcode {op} at word {i}"
                )));
            }
        }
    }
    Ok(out)
}

fn truncated(at: usize, what: &str) -> BlitError {
    BlitError::invalid_argument(format!("{what} record at word {at} is truncated"))
}

fn reg_label(reg: u16) -> String {
    regs::register_name(reg).unwrap_or_else(|| format!("{reg:#06x}"))
}

/// Field breakdown for registers whose raw value is hard to read.
fn describe(reg: u16, value: u32) -> Option<String> {
    let bank_field = (reg >= regs::SRC_BANK_BASE && reg < regs::src_bank(regs::SRC_BANKS))
        .then(|| (reg - regs::SRC_BANK_BASE) % regs::SRC_BANK_STRIDE);
    match (reg, bank_field) {
        (regs::DEST_CONFIG, _) => {
            let c = SurfaceConfig::decode(value);
            let cmd = Command::from_code(c.command)
                .map_or_else(|| format!("cmd {}", c.command), |c| format!("{c:?}"));
            Some(format!("{cmd} format {} swizzle {}", c.format, c.swizzle))
        }
        (_, Some(regs::SRC_CONFIG)) => {
            let c = SurfaceConfig::decode(value);
            Some(format!("format {} swizzle {}", c.format, c.swizzle))
        }
        (regs::DEST_ROTATION_CONFIG, _) | (_, Some(regs::SRC_ROTATION_CONFIG)) => {
            let r = RotationConfig::decode(value);
            Some(format!("width {} rot {}", r.width, r.quarter_turns * 90))
        }
        (_, Some(regs::SRC_ORIGIN | regs::SRC_SIZE))
        | (regs::CLIP_TOP_LEFT | regs::CLIP_BOTTOM_RIGHT, _) => {
            let (x, y) = regs::unpack_xy(value);
            Some(format!("({x}, {y})"))
        }
        (_, Some(regs::SRC_ALPHA_MODES)) => {
            let m = AlphaModes::decode(value);
            Some(format!(
                "src mode {}{} dst mode {}{} src1 {} src2 {}",
                m.src_mode,
                if m.src_reverse { "r" } else { "" },
                m.dst_mode,
                if m.dst_reverse { "r" } else { "" },
                m.src1_used,
                m.src2_used
            ))
        }
        (regs::MULTI_SOURCE_CONFIG, _) => Some(format!(
            "{} sources",
            regs::decode_multi_source(value)
        )),
        (regs::FILTER_CONFIG, _) => {
            let f = FilterConfig::decode(value);
            Some(format!(
                "pass {} taps {}x{}",
                f.pass, f.h_taps, f.v_taps
            ))
        }
        _ => None,
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadState {
                offset,
                reg,
                values,
            } => {
                write!(f, "{offset:04}: LOAD_STATE {} x{}", reg_label(*reg), values.len())?;
                // Kernel uploads are long and unreadable word by word.
                if regs::register_name(*reg).is_some_and(|n| n.starts_with("FILTER_KERNEL")) {
                    return Ok(());
                }
                for (i, v) in values.iter().enumerate() {
                    let r = reg + i as u16;
                    write!(f, "\n        {:<24} {v:#010x}", reg_label(r))?;
                    if let Some(d) = describe(r, *v) {
                        write!(f, "  {d}")?;
                    }
                }
                Ok(())
            }
            Self::StartDe { offset, rects } => {
                write!(f, "{offset:04}: START_DE")?;
                for r in rects {
                    write!(
                        f,
                        " [{},{} {}x{}]",
                        r.left, r.top, r.width, r.height
                    )?;
                }
                Ok(())
            }
            Self::Nop { offset } => write!(f, "{offset:04}: NOP"),
            Self::End { offset } => write!(f, "{offset:04}: END"),
        }
    }
}

/// Disassemble and render one buffer as text.
pub fn listing(words: &[u32]) -> BlitResult<String> {
    let records = disassemble(words)?;
    Ok(records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
#[path = "../../tests/unit/hw/disasm.rs"]
mod tests;
