//! Parsed instructions and operand shapes.
//!
//! An [`Instruction`] is an opcode plus a typed operand record, immutable once
//! parsed. Parsing normalizes comma/whitespace separation, validates the
//! operand count and shape against the instruction's format, and resolves
//! register and `offset(base)` memory operands. Anything that does not fit
//! fails loudly with [`SimError::MalformedOperands`]; the pipeline never sees
//! a partially-parsed instruction.

use std::fmt;

use crate::common::error::SimError;
use crate::common::reg::Reg;
use crate::isa::format::{InstrClass, InstrFormat};
use crate::isa::opcodes::{self, OpInfo};

/// An immediate operand: a numeric value or a symbolic label.
///
/// Labels are permitted only where the original assembly allows them, as
/// branch and jump targets. They are carried as text; the simulator does not
/// resolve addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Imm {
    /// A signed numeric immediate.
    Value(i64),
    /// A symbolic target label.
    Label(String),
}

impl Imm {
    /// Returns the numeric value, if this immediate is numeric.
    #[must_use]
    pub const fn value(&self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Label(l) => f.write_str(l),
        }
    }
}

/// Typed operand shapes, one per syntactic form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operands {
    /// `rd, rs1, rs2` (R-type).
    Register {
        /// Destination register.
        rd: Reg,
        /// First source register.
        rs1: Reg,
        /// Second source register.
        rs2: Reg,
    },
    /// `rd, rs1, imm` (ALU I-type and `jalr`).
    Immediate {
        /// Destination register.
        rd: Reg,
        /// Source register.
        rs1: Reg,
        /// Immediate operand.
        imm: Imm,
    },
    /// `rd, imm` (`li`, treated as `addi rd, x0, imm`).
    LoadImmediate {
        /// Destination register.
        rd: Reg,
        /// Immediate value.
        imm: Imm,
    },
    /// `reg, offset(base)` (loads and stores).
    Memory {
        /// Destination register for loads; data source register for stores.
        reg: Reg,
        /// Signed byte offset.
        offset: i64,
        /// Base address register.
        base: Reg,
    },
    /// `rs1, rs2, target` (B-type).
    Branch {
        /// First comparison register.
        rs1: Reg,
        /// Second comparison register.
        rs2: Reg,
        /// Branch target, numeric halfword offset or label.
        target: Imm,
    },
    /// `rd, imm` (U-type and `jal`).
    Upper {
        /// Destination register.
        rd: Reg,
        /// Immediate or jump target.
        imm: Imm,
    },
    /// No operands (`ecall`, `ebreak`).
    System,
}

/// A parsed instruction: opcode metadata plus typed operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    op: &'static OpInfo,
    operands: Operands,
}

impl Instruction {
    /// Parses one instruction line.
    ///
    /// `line` is the one-based position of the instruction in the input list
    /// and is attached to any error. Operands may be separated by commas,
    /// whitespace, or both.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownInstruction`] when the mnemonic is not in the
    /// opcode table; [`SimError::MalformedOperands`] when the operand count
    /// or shape does not match the instruction's format.
    pub fn parse(text: &str, line: usize) -> Result<Self, SimError> {
        let normalized = text.replace(',', " ");
        let mut tokens = normalized.split_whitespace();
        let Some(raw_mnemonic) = tokens.next() else {
            return Err(SimError::MalformedOperands {
                text: text.to_owned(),
                line,
                reason: "blank instruction".to_owned(),
            });
        };
        let mnemonic = raw_mnemonic.to_lowercase();
        let Some(op) = opcodes::lookup(&mnemonic) else {
            return Err(SimError::UnknownInstruction { mnemonic, line });
        };

        let args: Vec<&str> = tokens.collect();
        let operands = parse_operands(op, &args).map_err(|reason| SimError::MalformedOperands {
            text: text.trim().to_owned(),
            line,
            reason,
        })?;

        Ok(Self { op, operands })
    }

    /// The lowercase mnemonic.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        self.op.mnemonic
    }

    /// The opcode table entry backing this instruction.
    #[must_use]
    pub const fn op(&self) -> &'static OpInfo {
        self.op
    }

    /// The instruction class (format plus load/jump flags).
    #[must_use]
    pub const fn class(&self) -> InstrClass {
        self.op.class()
    }

    /// The typed operand record.
    #[must_use]
    pub const fn operands(&self) -> &Operands {
        &self.operands
    }

    /// The destination register this instruction writes, if any.
    ///
    /// `x0` writes are discarded by the register file and therefore reported
    /// as `None`: they can never be the producing side of a hazard.
    #[must_use]
    pub fn writes(&self) -> Option<Reg> {
        let rd = match self.operands {
            Operands::Register { rd, .. }
            | Operands::Immediate { rd, .. }
            | Operands::LoadImmediate { rd, .. }
            | Operands::Upper { rd, .. } => rd,
            Operands::Memory { reg, .. } if self.op.is_load => reg,
            Operands::Memory { .. } | Operands::Branch { .. } | Operands::System => return None,
        };
        (!rd.is_zero()).then_some(rd)
    }

    /// The source registers this instruction reads in ID.
    ///
    /// Reads of `x0` are excluded: the zero register always holds its value,
    /// so it can never be the consuming side of a hazard.
    #[must_use]
    pub fn reads(&self) -> Vec<Reg> {
        let mut sources = Vec::with_capacity(2);
        let mut push = |reg: Reg| {
            if !reg.is_zero() && !sources.contains(&reg) {
                sources.push(reg);
            }
        };
        match &self.operands {
            Operands::Register { rs1, rs2, .. } | Operands::Branch { rs1, rs2, .. } => {
                push(*rs1);
                push(*rs2);
            }
            Operands::Immediate { rs1, .. } => push(*rs1),
            Operands::Memory { reg, base, .. } => {
                push(*base);
                if !self.op.is_load {
                    push(*reg);
                }
            }
            Operands::LoadImmediate { .. } | Operands::Upper { .. } | Operands::System => {}
        }
        sources
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.op.mnemonic;
        match &self.operands {
            Operands::Register { rd, rs1, rs2 } => write!(f, "{m} {rd}, {rs1}, {rs2}"),
            Operands::Immediate { rd, rs1, imm } => write!(f, "{m} {rd}, {rs1}, {imm}"),
            Operands::LoadImmediate { rd, imm } | Operands::Upper { rd, imm } => {
                write!(f, "{m} {rd}, {imm}")
            }
            Operands::Memory { reg, offset, base } => write!(f, "{m} {reg}, {offset}({base})"),
            Operands::Branch { rs1, rs2, target } => write!(f, "{m} {rs1}, {rs2}, {target}"),
            Operands::System => f.write_str(m),
        }
    }
}

/// Parses a full program, attaching one-based line positions to errors.
///
/// # Errors
///
/// [`SimError::EmptyProgram`] for an empty list; otherwise the first parse
/// error encountered, in input order.
pub fn parse_program<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Instruction>, SimError> {
    if lines.is_empty() {
        return Err(SimError::EmptyProgram);
    }
    lines
        .iter()
        .enumerate()
        .map(|(index, text)| Instruction::parse(text.as_ref(), index + 1))
        .collect()
}

fn parse_operands(op: &'static OpInfo, args: &[&str]) -> Result<Operands, String> {
    match op.format {
        InstrFormat::R => {
            let [rd, rs1, rs2] = expect_args(op, args, "rd, rs1, rs2")?;
            Ok(Operands::Register {
                rd: reg(rd)?,
                rs1: reg(rs1)?,
                rs2: reg(rs2)?,
            })
        }
        InstrFormat::I if op.is_load => {
            let [rd, mem] = expect_args(op, args, "rd, offset(base)")?;
            let (offset, base) = mem_operand(mem)?;
            Ok(Operands::Memory {
                reg: reg(rd)?,
                offset,
                base,
            })
        }
        InstrFormat::I => match op.mnemonic {
            "li" => {
                let [rd, imm] = expect_args(op, args, "rd, imm")?;
                Ok(Operands::LoadImmediate {
                    rd: reg(rd)?,
                    imm: Imm::Value(numeric(imm)?),
                })
            }
            "ecall" | "ebreak" => {
                if args.is_empty() {
                    Ok(Operands::System)
                } else {
                    Err(format!("`{}` takes no operands", op.mnemonic))
                }
            }
            _ => {
                let [rd, rs1, imm] = expect_args(op, args, "rd, rs1, imm")?;
                Ok(Operands::Immediate {
                    rd: reg(rd)?,
                    rs1: reg(rs1)?,
                    imm: Imm::Value(numeric(imm)?),
                })
            }
        },
        InstrFormat::S => {
            let [rs2, mem] = expect_args(op, args, "rs2, offset(base)")?;
            let (offset, base) = mem_operand(mem)?;
            Ok(Operands::Memory {
                reg: reg(rs2)?,
                offset,
                base,
            })
        }
        InstrFormat::B => {
            let [rs1, rs2, target] = expect_args(op, args, "rs1, rs2, target")?;
            Ok(Operands::Branch {
                rs1: reg(rs1)?,
                rs2: reg(rs2)?,
                target: target_operand(target),
            })
        }
        InstrFormat::U => {
            let [rd, imm] = expect_args(op, args, "rd, imm")?;
            Ok(Operands::Upper {
                rd: reg(rd)?,
                imm: Imm::Value(numeric(imm)?),
            })
        }
        InstrFormat::J => {
            let [rd, target] = expect_args(op, args, "rd, target")?;
            Ok(Operands::Upper {
                rd: reg(rd)?,
                imm: target_operand(target),
            })
        }
    }
}

fn expect_args<'a, const N: usize>(
    op: &'static OpInfo,
    args: &[&'a str],
    shape: &str,
) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args)
        .map_err(|_| format!("expected `{} {shape}`, got {} operand(s)", op.mnemonic, args.len()))
}

fn reg(token: &str) -> Result<Reg, String> {
    Reg::parse(token).ok_or_else(|| format!("`{token}` is not a register (expected x0..x31)"))
}

fn numeric(token: &str) -> Result<i64, String> {
    token
        .parse::<i64>()
        .map_err(|_| format!("`{token}` is not a numeric immediate"))
}

/// Branch/jump targets may be numeric offsets or symbolic labels.
fn target_operand(token: &str) -> Imm {
    token
        .parse::<i64>()
        .map_or_else(|_| Imm::Label(token.to_owned()), Imm::Value)
}

/// Parses an `offset(base)` memory operand, e.g. `0(x2)` or `-4(x8)`.
fn mem_operand(token: &str) -> Result<(i64, Reg), String> {
    let bad = || format!("`{token}` is not a memory operand (expected offset(base))");
    let open = token.find('(').ok_or_else(bad)?;
    let close = token.rfind(')').ok_or_else(bad)?;
    if close != token.len() - 1 || close <= open {
        return Err(bad());
    }
    let offset = token[..open].parse::<i64>().map_err(|_| bad())?;
    let base = Reg::parse(&token[open + 1..close]).ok_or_else(bad)?;
    Ok((offset, base))
}
