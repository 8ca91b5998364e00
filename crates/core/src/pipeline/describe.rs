//! Per-cycle component annotations for display.
//!
//! [`describe`] enriches a [`CycleRecord`] with a human-readable explanation
//! for each active datapath component, built from the occupying instruction's
//! operands. This is a pure formatting layer over the trace: a shape the
//! formatter cannot explain degrades to an `N/A` placeholder rather than
//! aborting, since this output only feeds presentation.

use serde::Serialize;

use crate::isa::instruction::{Imm, Instruction, Operands};
use crate::pipeline::trace::{CycleRecord, StageSlot};

/// A component annotation: the carried value plus an explanatory comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Annotated {
    /// The value the component carries this cycle.
    pub value: String,
    /// Explanation of the component's role.
    pub comment: String,
}

/// A bare explanatory value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextValue {
    /// The explanation text.
    pub value: String,
}

/// The ALU annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AluResult {
    /// Explanation of the ALU's work this cycle.
    pub alu_result: String,
}

/// Register file port annotations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterFile {
    /// First read port.
    pub read_register_1: Annotated,
    /// Second read port.
    pub read_register_2: Annotated,
    /// Write port.
    pub write_register: Annotated,
}

/// Data memory port annotations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DataMemory {
    /// Read port.
    pub read_data: String,
    /// Write port.
    pub write_data: String,
}

/// IF-stage components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IfComponents {
    /// Program counter.
    pub pc: Annotated,
    /// Instruction memory.
    pub instruction_mem: Annotated,
    /// The PC + 4 adder.
    pub default_adder: TextValue,
}

/// ID-stage components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IdComponents {
    /// Register file ports.
    pub registers: RegisterFile,
    /// Immediate generator, when the format carries an immediate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imm_gen: Option<TextValue>,
}

/// EX-stage components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExComponents {
    /// The ALU.
    pub alu: AluResult,
    /// Branch-target adder, for branches and jumps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_adder: Option<TextValue>,
}

/// MEM-stage components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemComponents {
    /// Data memory ports.
    pub data_memory: DataMemory,
}

/// Component annotations for every occupied stage of one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Components {
    /// IF components.
    #[serde(rename = "IF", skip_serializing_if = "Option::is_none")]
    pub fetch: Option<IfComponents>,
    /// ID components.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub decode: Option<IdComponents>,
    /// EX components.
    #[serde(rename = "EX", skip_serializing_if = "Option::is_none")]
    pub execute: Option<ExComponents>,
    /// MEM components.
    #[serde(rename = "MEM", skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemComponents>,
}

/// A cycle record plus its component annotations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnrichedCycleRecord {
    /// The underlying record.
    #[serde(flatten)]
    pub record: CycleRecord,
    /// Component annotations.
    pub component: Components,
}

const NA: &str = "N/A";
const PC_COMMENT: &str = "Program Counter (PC): Holds the address of the current instruction. \
    The instruction is fetched using the current PC value, then PC is updated to point to the \
    next instruction address.";
const DEFAULT_ADDER: &str = "Adds 4 to the current PC value to get the address of the next \
    instruction.";

/// Enriches one cycle record with component annotations.
#[must_use]
pub fn describe(record: &CycleRecord) -> EnrichedCycleRecord {
    let redirecting = record
        .stage_details
        .fetch
        .is_some_and(|signals| signals.branch_taken);

    let mut component = Components {
        fetch: if_components(record, redirecting),
        decode: instr_in(record.stages.decode.as_ref()).map(id_components),
        execute: instr_in(record.stages.execute.as_ref()).map(ex_components),
        memory: instr_in(record.stages.memory.as_ref()).map(mem_components),
    };

    // The register file commits in the first half of WB; surface that on the
    // decode view so the reader can see the value becoming available.
    if let Some(instr) = instr_in(record.stages.writeback.as_ref()) {
        if let Some(rd) = instr.writes() {
            let note = format!("\nNote that {rd} is now written back.");
            match component.decode.as_mut() {
                Some(decode) => decode.registers.write_register.comment.push_str(&note),
                None => {
                    component.decode = Some(IdComponents {
                        registers: RegisterFile {
                            read_register_1: annotated(NA, "Read Register 1: Not used in this stage"),
                            read_register_2: annotated(NA, "Read Register 2: Not used in this stage"),
                            write_register: annotated(NA, &format!("Write Register: {NA}{note}")),
                        },
                        imm_gen: None,
                    });
                }
            }
        }
    }

    EnrichedCycleRecord {
        record: record.clone(),
        component,
    }
}

fn instr_in(slot: Option<&StageSlot>) -> Option<&Instruction> {
    slot.and_then(StageSlot::instruction)
}

fn annotated(value: &str, comment: &str) -> Annotated {
    Annotated {
        value: value.to_owned(),
        comment: comment.to_owned(),
    }
}

/// Doubles a halfword branch/jump offset, keeping labels symbolic.
fn scaled_target(target: &Imm) -> String {
    match target.value() {
        Some(v) => v.saturating_mul(2).to_string(),
        None => target.to_string(),
    }
}

fn if_components(record: &CycleRecord, redirecting: bool) -> Option<IfComponents> {
    if redirecting {
        // The PC was just steered by the instruction now in MEM.
        let pc_value = instr_in(record.stages.memory.as_ref()).map_or_else(
            || "PC = branch target".to_owned(),
            |source| match source.operands() {
                Operands::Branch { target, .. } => format!("PC = PC + {}", scaled_target(target)),
                Operands::Immediate { rs1, imm, .. } => format!("PC = Val({rs1}) + {imm}"),
                Operands::Upper { imm, .. } => format!("PC = PC + {}", scaled_target(imm)),
                _ => "PC = branch target".to_owned(),
            },
        );
        return Some(IfComponents {
            pc: annotated(
                &pc_value,
                "Program Counter (PC): The sequential path is abandoned; the PC is steered to \
                 the resolved target address.",
            ),
            instruction_mem: annotated(
                instr_in(record.stages.fetch.as_ref())
                    .map(ToString::to_string)
                    .as_deref()
                    .unwrap_or("None"),
                "Instruction Memory: Outputs the instruction at the redirected PC address for \
                 decoding and execution.",
            ),
            default_adder: TextValue {
                value: DEFAULT_ADDER.to_owned(),
            },
        });
    }

    let instr = instr_in(record.stages.fetch.as_ref())?;
    let format = instr.class().format;
    Some(IfComponents {
        pc: annotated("PC = PC + 4", PC_COMMENT),
        instruction_mem: annotated(
            &instr.to_string(),
            &format!(
                "Instruction Memory: Stores program instructions. Outputs the fetched \
                 {format}-type instruction (at the current PC address) for decoding and execution."
            ),
        ),
        default_adder: TextValue {
            value: DEFAULT_ADDER.to_owned(),
        },
    })
}

fn imm_gen_text(instr: &Instruction, purpose: &str, imm: &str) -> TextValue {
    TextValue {
        value: format!(
            "Extracts and sign-extends the immediate value from the instruction for use in \
             {purpose}.\nInput: The instruction: {instr}\nOutput: The immediate: {imm}."
        ),
    }
}

fn id_components(instr: &Instruction) -> IdComponents {
    match instr.operands() {
        Operands::Register { rd, rs1, rs2 } => IdComponents {
            registers: RegisterFile {
                read_register_1: annotated(
                    &format!("Val({rs1})"),
                    &format!("Read Register 1: Reads value from source register {rs1}"),
                ),
                read_register_2: annotated(
                    &format!("Val({rs2})"),
                    &format!("Read Register 2: Reads value from source register {rs2}"),
                ),
                write_register: annotated(
                    &rd.to_string(),
                    &format!("Write Register: Destination register {rd} for ALU result"),
                ),
            },
            imm_gen: None,
        },
        Operands::Immediate { rd, rs1, imm } => {
            let purpose = if instr.class().is_jump {
                "jump target calculation"
            } else {
                "the immediate operation"
            };
            IdComponents {
                registers: RegisterFile {
                    read_register_1: annotated(
                        &format!("Val({rs1})"),
                        &format!("Read Register 1: Reads value from source register {rs1}."),
                    ),
                    read_register_2: annotated(
                        NA,
                        "Read Register 2: Not used in immediate instruction",
                    ),
                    write_register: annotated(
                        &rd.to_string(),
                        &format!("Write Register: Destination register {rd} for the result"),
                    ),
                },
                imm_gen: Some(imm_gen_text(instr, purpose, &imm.to_string())),
            }
        }
        Operands::LoadImmediate { rd, imm } => IdComponents {
            registers: RegisterFile {
                read_register_1: annotated(
                    "Val(x0)",
                    "Read Register 1: Reads the zero register; li is treated as addi rd, x0, imm",
                ),
                read_register_2: annotated(NA, "Read Register 2: Not used in li instruction"),
                write_register: annotated(
                    &rd.to_string(),
                    &format!("Write Register: Destination register {rd} for the immediate value"),
                ),
            },
            imm_gen: Some(imm_gen_text(instr, "the immediate operation", &imm.to_string())),
        },
        Operands::Memory { reg, offset, base } => {
            let load = instr.class().is_load;
            IdComponents {
                registers: RegisterFile {
                    read_register_1: annotated(
                        &format!("Val({base})"),
                        &format!("Read Register 1: Reads base address from register {base} for memory access."),
                    ),
                    read_register_2: if load {
                        annotated(NA, "Read Register 2: Not used in load instruction.")
                    } else {
                        annotated(
                            &format!("Val({reg})"),
                            &format!("Read Register 2: Reads value to store from register {reg}"),
                        )
                    },
                    write_register: if load {
                        annotated(
                            &reg.to_string(),
                            &format!("Write Register: Destination register {reg} for loaded data."),
                        )
                    } else {
                        annotated(NA, "Write Register: No write register")
                    },
                },
                imm_gen: Some(imm_gen_text(instr, "address calculation", &offset.to_string())),
            }
        }
        Operands::Branch { rs1, rs2, target } => IdComponents {
            registers: RegisterFile {
                read_register_1: annotated(
                    &format!("Val({rs1})"),
                    &format!("Read Register 1: Reads value from register {rs1} for branch comparison"),
                ),
                read_register_2: annotated(
                    &format!("Val({rs2})"),
                    &format!("Read Register 2: Reads value from register {rs2} for branch comparison"),
                ),
                write_register: annotated(NA, "Write Register: No write register"),
            },
            imm_gen: Some(imm_gen_text(instr, "branch target calculation", &target.to_string())),
        },
        Operands::Upper { rd, imm } => IdComponents {
            registers: RegisterFile {
                read_register_1: annotated(
                    NA,
                    &format!("Read Register 1: Not used in {}-type instruction.", instr.class().format),
                ),
                read_register_2: annotated(NA, "Read Register 2: Not used in this instruction"),
                write_register: annotated(
                    &rd.to_string(),
                    &format!("Write Register: Destination register {rd} for the result"),
                ),
            },
            imm_gen: Some(imm_gen_text(instr, "the immediate operation", &imm.to_string())),
        },
        Operands::System => IdComponents {
            registers: RegisterFile {
                read_register_1: annotated(NA, "Read Register 1: Not used in system instruction"),
                read_register_2: annotated(NA, "Read Register 2: Not used in system instruction"),
                write_register: annotated(NA, "Write Register: No write register"),
            },
            imm_gen: None,
        },
    }
}

fn ex_components(instr: &Instruction) -> ExComponents {
    let op = instr.op();
    let (symbol, name) = (op.alu_symbol, op.alu_name);
    match instr.operands() {
        Operands::Register { rs1, rs2, .. } => ExComponents {
            alu: AluResult {
                alu_result: format!(
                    "ALU: Performs {name} operation → Val({rs1}) {symbol} Val({rs2})."
                ),
            },
            branch_adder: None,
        },
        Operands::Immediate { rs1, imm, .. } => {
            if instr.class().is_jump {
                ExComponents {
                    alu: AluResult {
                        alu_result: format!(
                            "ALU: Computes the jump target → Val({rs1}) + {imm}; PC + 4 is \
                             passed on for the link register."
                        ),
                    },
                    branch_adder: None,
                }
            } else {
                ExComponents {
                    alu: AluResult {
                        alu_result: format!(
                            "ALU: Performs {name} operation → Val({rs1}) {symbol} {imm}."
                        ),
                    },
                    branch_adder: None,
                }
            }
        }
        Operands::LoadImmediate { imm, .. } => ExComponents {
            alu: AluResult {
                alu_result: format!("ALU: Performs ADD operation → Val(x0) + {imm}."),
            },
            branch_adder: None,
        },
        Operands::Memory { offset, base, .. } => {
            let role = if instr.class().is_load {
                "to calculate the load address"
            } else {
                "to calculate the store address"
            };
            ExComponents {
                alu: AluResult {
                    alu_result: format!("ALU: Performs ADD operation {role} → Val({base}) + {offset}."),
                },
                branch_adder: None,
            }
        }
        Operands::Branch { rs1, rs2, target } => {
            let scaled = scaled_target(target);
            ExComponents {
                alu: AluResult {
                    alu_result: format!(
                        "ALU: Branch comparison → Val({rs1}) {symbol} Val({rs2}). If the \
                         condition holds, the branch is taken to PC + {scaled}."
                    ),
                },
                branch_adder: Some(TextValue {
                    value: format!(
                        "Calculates the branch target address by adding the immediate to the \
                         incremented PC value.\nInput: the current PC and the immediate {target} \
                         shifted left by 1, giving {scaled}\nOutput: target PC = PC + {scaled}"
                    ),
                }),
            }
        }
        Operands::Upper { imm, .. } => {
            if instr.class().is_jump {
                let scaled = scaled_target(imm);
                ExComponents {
                    alu: AluResult {
                        alu_result: "ALU: Passes PC + 4 on for the link register while the \
                                     adder computes the jump target."
                            .to_owned(),
                    },
                    branch_adder: Some(TextValue {
                        value: format!(
                            "Calculates the jump target address by adding the immediate to the \
                             PC.\nInput: the current PC and the immediate {imm} shifted left by \
                             1, giving {scaled}\nOutput: target PC = PC + {scaled}"
                        ),
                    }),
                }
            } else if instr.mnemonic() == "lui" {
                ExComponents {
                    alu: AluResult {
                        alu_result: format!("ALU: Performs {name} operation → {imm} {symbol} 12."),
                    },
                    branch_adder: None,
                }
            } else {
                ExComponents {
                    alu: AluResult {
                        alu_result: format!("ALU: Performs {name} operation → PC {symbol} {imm}."),
                    },
                    branch_adder: None,
                }
            }
        }
        Operands::System => ExComponents {
            alu: AluResult {
                alu_result: format!("ALU: No arithmetic for {}; control transfers to the \
                                     environment.", instr.mnemonic()),
            },
            branch_adder: None,
        },
    }
}

fn mem_components(instr: &Instruction) -> MemComponents {
    const NO_READ: &str = "Read Data: No data read from memory.";
    const NO_WRITE: &str = "Write Data: No data written to memory.";
    match instr.operands() {
        Operands::Memory { reg, offset, base } if instr.class().is_load => MemComponents {
            data_memory: DataMemory {
                read_data: format!("Read Data: Read from address Val({base}) + {offset} to {reg}."),
                write_data: NO_WRITE.to_owned(),
            },
        },
        Operands::Memory { reg, offset, base } => MemComponents {
            data_memory: DataMemory {
                read_data: NO_READ.to_owned(),
                write_data: format!(
                    "Write Data: Store Val({reg}) at address Val({base}) + {offset}."
                ),
            },
        },
        _ => MemComponents {
            data_memory: DataMemory {
                read_data: NO_READ.to_owned(),
                write_data: NO_WRITE.to_owned(),
            },
        },
    }
}
