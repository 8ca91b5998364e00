//! Single-cycle (non-pipelined) datapath view.
//!
//! The single-cycle model has no pipeline registers to cross, so its tables
//! are a reduced form covering the R, I, B, and S formats only: one fully
//! populated datapath record plus component annotations for one instruction.
//! There is no scheduling, no hazard logic, and no trace; the caller supplies
//! the instruction together with its pre-classified format tag.

use serde::Serialize;

use crate::common::error::SimError;
use crate::isa::format::InstrFormat;
use crate::isa::instruction::{Instruction, Operands};
use crate::pipeline::describe::{AluResult, Annotated, DataMemory, RegisterFile, TextValue};

/// Live wires of the complete single-cycle datapath.
///
/// One boolean per wire/mux path of the rendered diagram, fully populated in
/// one call; field names follow the diagram and are part of the renderer
/// contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DataPath {
    /// A taken branch steers the PC.
    pub branch_taken: bool,
    /// PC source mux output is live.
    pub mux_pc: bool,
    /// PC + 4 incrementer is live.
    pub pc_increment: bool,
    /// Sequential PC path is selected.
    pub pc_default: bool,
    /// PC feeds the branch-target adder.
    pub pc_add: bool,
    /// Instruction word feeds the first register read port.
    pub im_reg1: bool,
    /// Instruction word feeds the second register read port.
    pub im_reg2: bool,
    /// Instruction word feeds the write-register index.
    pub im_reg_write: bool,
    /// Instruction word feeds the immediate generator.
    pub im_imm_gen: bool,
    /// Immediate generator output feeds the left-shifter.
    pub imm_gen_shift: bool,
    /// Immediate generator output feeds the operand-B mux.
    pub imm_gen_mux: bool,
    /// First register value feeds the ALU.
    pub reg1_mux: bool,
    /// Second register value feeds the operand-B mux.
    pub reg2_mux: bool,
    /// Operand-B mux output feeds the ALU.
    pub mux_alu: bool,
    /// ALU zero flag is asserted.
    pub zero: bool,
    /// ALU result drives the data memory address port.
    pub alu_res_mem: bool,
    /// ALU result feeds the write-back mux.
    pub alu_res_mux: bool,
    /// Second register value drives the data memory write port.
    pub reg2_dm: bool,
    /// Data memory read value feeds the write-back mux.
    pub dm_mux: bool,
    /// Register file write port is enabled.
    pub reg_write: bool,
    /// Control: ALU operand B comes from the immediate.
    pub alu_src: bool,
    /// Control: write-back value comes from memory.
    pub memto_reg: bool,
    /// Control: memory read enable.
    pub mem_read: bool,
    /// Control: memory write enable.
    pub mem_write: bool,
    /// Control: register write enable.
    pub reg_write_control: bool,
    /// Control: instruction is a branch.
    pub branch: bool,
    /// Control: ALU operation select bit 0.
    pub alu_op_0: bool,
    /// Control: ALU operation select bit 1.
    pub alu_op_1: bool,
}

/// Component annotations for the single-cycle diagram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockData {
    /// Program counter.
    pub pc: Annotated,
    /// The PC + 4 adder.
    pub default_adder: TextValue,
    /// Immediate generator, when the format carries an immediate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate_generator: Option<TextValue>,
    /// Branch-target adder, for branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_adder: Option<TextValue>,
    /// Instruction memory.
    pub instruction_mem: Annotated,
    /// Register file ports.
    pub registers: RegisterFile,
    /// The ALU.
    pub alu: AluResult,
    /// Data memory ports.
    pub data_memory: DataMemory,
}

/// The single-cycle datapath view for one instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SingleCycleView {
    /// Live wires.
    pub data_path: DataPath,
    /// Component annotations.
    pub block_data: BlockData,
    /// The instruction's format tag.
    #[serde(rename = "command_type")]
    pub format: InstrFormat,
}

const NO_READ: &str = "Read Data: No data is read from memory for this instruction";
const NO_WRITE: &str = "Write Data: No data is written to memory for this instruction";
const PC_COMMENT: &str = "Program Counter (PC): Holds the address of the current instruction. \
    The instruction is fetched using the current PC value, then PC is updated to PC + 4 to \
    point to the next sequential instruction address.";
const DEFAULT_ADDER: &str = "Adds 4 to the current PC value to get the address of the next \
    instruction.";

/// Builds the single-cycle datapath view for one pre-classified instruction.
///
/// # Errors
///
/// [`SimError::UnsupportedFormat`] for U/J instructions and for the jump and
/// system members of the I format; [`SimError::MalformedOperands`] when the
/// supplied tag disagrees with the instruction's own classification.
pub fn datapath(instr: &Instruction, format: InstrFormat) -> Result<SingleCycleView, SimError> {
    if format != instr.class().format {
        return Err(SimError::MalformedOperands {
            text: instr.to_string(),
            line: 0,
            reason: format!(
                "format tag {format} does not match the instruction's {} format",
                instr.class().format
            ),
        });
    }
    match format {
        InstrFormat::R => Ok(r_type(instr)),
        InstrFormat::I => i_type(instr),
        InstrFormat::B => Ok(b_type(instr)),
        InstrFormat::S => Ok(s_type(instr)),
        InstrFormat::U | InstrFormat::J => Err(SimError::UnsupportedFormat {
            what: format!("{format}-format instructions"),
        }),
    }
}

fn annotated(value: String, comment: String) -> Annotated {
    Annotated { value, comment }
}

fn base_block(instr: &Instruction, mem_comment: &str) -> (Annotated, TextValue, Annotated) {
    (
        annotated("PC = PC + 4".to_owned(), PC_COMMENT.to_owned()),
        TextValue {
            value: DEFAULT_ADDER.to_owned(),
        },
        annotated(instr.to_string(), mem_comment.to_owned()),
    )
}

fn imm_gen(instr: &Instruction, purpose: &str, imm: &str) -> TextValue {
    TextValue {
        value: format!(
            "Extracts and sign-extends the immediate value from the instruction for use in \
             {purpose}.\nInput: The instruction: {instr}\nOutput: The immediate value: {imm}"
        ),
    }
}

fn r_type(instr: &Instruction) -> SingleCycleView {
    let data_path = DataPath {
        mux_pc: true,
        pc_increment: true,
        pc_default: true,
        im_reg1: true,
        im_reg2: true,
        im_reg_write: true,
        reg1_mux: true,
        reg2_mux: true,
        mux_alu: true,
        alu_res_mux: true,
        reg_write: true,
        alu_op_1: true,
        alu_op_0: true,
        reg_write_control: true,
        ..DataPath::default()
    };
    let (pc, default_adder, instruction_mem) = base_block(
        instr,
        "Instruction Memory: Stores program instructions. Outputs the fetched R-type \
         instruction (at the current PC address) for decoding and execution.",
    );
    let (rd, rs1, rs2) = match instr.operands() {
        Operands::Register { rd, rs1, rs2 } => {
            (rd.to_string(), rs1.to_string(), rs2.to_string())
        }
        _ => ("N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned()),
    };
    let op = instr.op();
    SingleCycleView {
        data_path,
        block_data: BlockData {
            pc,
            default_adder,
            immediate_generator: None,
            branch_adder: None,
            instruction_mem,
            registers: RegisterFile {
                read_register_1: annotated(
                    format!("Val({rs1})"),
                    format!("Read Register 1: Reads value from source register {rs1} (first operand)"),
                ),
                read_register_2: annotated(
                    format!("Val({rs2})"),
                    format!("Read Register 2: Reads value from source register {rs2} (second operand)"),
                ),
                write_register: annotated(
                    format!("{rd} ← Val({rs1}) {} Val({rs2})", op.alu_symbol),
                    format!("Write Register: Writes the ALU result back to destination register {rd}"),
                ),
            },
            alu: AluResult {
                alu_result: format!(
                    "The ALU performs arithmetic and logic operations.\nIn this case it performs \
                     the {} operation → Val({rs1}) {} Val({rs2}).",
                    op.alu_name, op.alu_symbol
                ),
            },
            data_memory: DataMemory {
                read_data: NO_READ.to_owned(),
                write_data: NO_WRITE.to_owned(),
            },
        },
        format: InstrFormat::R,
    }
}

fn i_type(instr: &Instruction) -> Result<SingleCycleView, SimError> {
    let class = instr.class();
    if class.is_jump || matches!(instr.operands(), Operands::System) {
        return Err(SimError::UnsupportedFormat {
            what: format!("`{}`", instr.mnemonic()),
        });
    }
    if class.is_load {
        return Ok(i_load(instr));
    }
    let data_path = DataPath {
        mux_pc: true,
        pc_increment: true,
        pc_default: true,
        im_reg1: true,
        im_reg_write: true,
        im_imm_gen: true,
        reg1_mux: true,
        imm_gen_mux: true,
        mux_alu: true,
        alu_res_mux: true,
        reg_write: true,
        alu_src: true,
        reg_write_control: true,
        ..DataPath::default()
    };
    let (pc, default_adder, instruction_mem) = base_block(
        instr,
        "Instruction Memory: Stores program instructions. Outputs the fetched I-type \
         instruction (at the current PC address) containing an immediate value for decoding \
         and execution.",
    );
    let op = instr.op();
    let (rd, rs1, imm) = match instr.operands() {
        Operands::Immediate { rd, rs1, imm } => (rd.to_string(), rs1.to_string(), imm.to_string()),
        Operands::LoadImmediate { rd, imm } => (rd.to_string(), "x0".to_owned(), imm.to_string()),
        _ => ("N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned()),
    };
    Ok(SingleCycleView {
        data_path,
        block_data: BlockData {
            pc,
            default_adder,
            immediate_generator: Some(imm_gen(instr, "ALU operations", &imm)),
            branch_adder: None,
            instruction_mem,
            registers: RegisterFile {
                read_register_1: annotated(
                    format!("Val({rs1})"),
                    format!("Read Register 1: Reads value from source register {rs1}."),
                ),
                read_register_2: annotated(
                    "Not used".to_owned(),
                    "Read Register 2: Second read port not used (immediate value used instead)."
                        .to_owned(),
                ),
                write_register: annotated(
                    format!("{rd} ← Val({rs1}) {} {imm}", op.alu_symbol),
                    format!("Write Register: Writes the result to destination register {rd}."),
                ),
            },
            alu: AluResult {
                alu_result: format!(
                    "The ALU performs arithmetic and logic operations.\nIn this case it performs \
                     the {} operation → Val({rs1}) {} {imm} (immediate).",
                    op.alu_name, op.alu_symbol
                ),
            },
            data_memory: DataMemory {
                read_data: NO_READ.to_owned(),
                write_data: NO_WRITE.to_owned(),
            },
        },
        format: InstrFormat::I,
    })
}

fn i_load(instr: &Instruction) -> SingleCycleView {
    let data_path = DataPath {
        pc_default: true,
        mux_pc: true,
        pc_increment: true,
        im_reg1: true,
        im_imm_gen: true,
        im_reg_write: true,
        reg1_mux: true,
        imm_gen_mux: true,
        mux_alu: true,
        alu_res_mem: true,
        reg_write: true,
        dm_mux: true,
        alu_src: true,
        memto_reg: true,
        mem_read: true,
        ..DataPath::default()
    };
    let (pc, default_adder, instruction_mem) = base_block(
        instr,
        "Instruction Memory: Stores program instructions. Outputs the fetched load \
         instruction (at the current PC address) with base register and offset for decoding \
         and execution.",
    );
    let (rd, offset, base) = match instr.operands() {
        Operands::Memory { reg, offset, base } => {
            (reg.to_string(), offset.to_string(), base.to_string())
        }
        _ => ("N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned()),
    };
    SingleCycleView {
        data_path,
        block_data: BlockData {
            pc,
            default_adder,
            immediate_generator: Some(imm_gen(instr, "ALU operations", &offset)),
            branch_adder: None,
            instruction_mem,
            registers: RegisterFile {
                read_register_1: annotated(
                    format!("Val({base})"),
                    format!("Read Register 1: Reads base address from source register {base}"),
                ),
                read_register_2: annotated(
                    "Not used".to_owned(),
                    "Read Register 2: Second read port not used (offset is immediate)".to_owned(),
                ),
                write_register: annotated(
                    format!("{rd} ← Memory[Val({base}) + {offset}]"),
                    format!("Write Register: Writes loaded data from memory to destination register {rd}"),
                ),
            },
            alu: AluResult {
                alu_result: format!(
                    "The ALU performs the ADD operation to calculate the memory address from \
                     which data is loaded.\nALU Result: Val({base}) + {offset} (address calculation)."
                ),
            },
            data_memory: DataMemory {
                read_data: format!("Read Data: Reads a value from address [Val({base}) + {offset}]."),
                write_data: NO_WRITE.to_owned(),
            },
        },
        format: InstrFormat::I,
    }
}

/// With no register values modeled, the comparison is evaluated under the
/// assumption that both compared values are equal: `beq`/`bge`/`bgeu` take
/// their branch, `bne`/`blt`/`bltu` fall through.
fn assumed_taken(mnemonic: &str) -> bool {
    matches!(mnemonic, "beq" | "bge" | "bgeu")
}

fn b_type(instr: &Instruction) -> SingleCycleView {
    let taken = assumed_taken(instr.mnemonic());
    let data_path = DataPath {
        mux_pc: true,
        pc_increment: true,
        pc_default: true,
        im_reg1: true,
        im_reg2: true,
        reg1_mux: true,
        reg2_mux: true,
        im_imm_gen: true,
        imm_gen_shift: true,
        imm_gen_mux: taken,
        mux_alu: true,
        pc_add: true,
        zero: taken,
        branch_taken: taken,
        branch: true,
        alu_op_0: true,
        ..DataPath::default()
    };
    let (rs1, rs2, target, scaled) = match instr.operands() {
        Operands::Branch { rs1, rs2, target } => {
            let scaled = target
                .value()
                .map_or_else(|| target.to_string(), |v| v.saturating_mul(2).to_string());
            (rs1.to_string(), rs2.to_string(), target.to_string(), scaled)
        }
        _ => ("N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned()),
    };
    let pc_value = if taken {
        format!("PC = PC + {scaled} (assuming the branch is taken)")
    } else {
        "PC = PC + 4 (assuming the branch is not taken)".to_owned()
    };
    let op = instr.op();
    SingleCycleView {
        data_path,
        block_data: BlockData {
            pc: annotated(
                pc_value,
                "Program Counter (PC): Holds the address of the current instruction. PC is \
                 updated to the branch target (PC + offset) if the condition holds, or PC + 4 \
                 otherwise."
                    .to_owned(),
            ),
            default_adder: TextValue {
                value: DEFAULT_ADDER.to_owned(),
            },
            immediate_generator: Some(imm_gen(instr, "branch target calculation", &target)),
            branch_adder: Some(TextValue {
                value: format!(
                    "Calculates the branch target address by adding the sign-extended immediate \
                     to the current PC value.\nOutputs: PC + {scaled}"
                ),
            }),
            instruction_mem: annotated(
                instr.to_string(),
                "Instruction Memory: Stores program instructions. Outputs the fetched branch \
                 instruction (at the current PC address) with comparison registers and offset \
                 for decoding and execution."
                    .to_owned(),
            ),
            registers: RegisterFile {
                read_register_1: annotated(
                    format!("Val({rs1})"),
                    format!("Read Register 1: Reads the first comparison value from source register {rs1}"),
                ),
                read_register_2: annotated(
                    format!("Val({rs2})"),
                    format!("Read Register 2: Reads the second comparison value from source register {rs2}"),
                ),
                write_register: annotated(
                    "N/A".to_owned(),
                    "Write Register: No register write (branch instructions don't modify registers)"
                        .to_owned(),
                ),
            },
            alu: AluResult {
                alu_result: format!(
                    "The ALU compares the two register values for the branch condition.\nALU: \
                     {} operation → Val({rs1}) {} Val({rs2}).\nNote: both register values are \
                     assumed equal in this view.",
                    instr.mnemonic().to_uppercase(),
                    op.alu_symbol
                ),
            },
            data_memory: DataMemory {
                read_data: "Read Data: No data read from memory.".to_owned(),
                write_data: "Write Data: No data written to memory.".to_owned(),
            },
        },
        format: InstrFormat::B,
    }
}

fn s_type(instr: &Instruction) -> SingleCycleView {
    let data_path = DataPath {
        pc_default: true,
        mux_pc: true,
        pc_increment: true,
        im_reg1: true,
        im_reg2: true,
        im_imm_gen: true,
        reg1_mux: true,
        imm_gen_mux: true,
        mux_alu: true,
        reg2_dm: true,
        alu_res_mem: true,
        alu_src: true,
        mem_write: true,
        ..DataPath::default()
    };
    let (pc, default_adder, instruction_mem) = base_block(
        instr,
        "Instruction Memory: Stores program instructions. Outputs the fetched store \
         instruction (at the current PC address) with base register, source register, and \
         offset for decoding and execution.",
    );
    let (rs2, offset, base) = match instr.operands() {
        Operands::Memory { reg, offset, base } => {
            (reg.to_string(), offset.to_string(), base.to_string())
        }
        _ => ("N/A".to_owned(), "N/A".to_owned(), "N/A".to_owned()),
    };
    SingleCycleView {
        data_path,
        block_data: BlockData {
            pc,
            default_adder,
            immediate_generator: Some(imm_gen(instr, "address calculation", &offset)),
            branch_adder: None,
            instruction_mem,
            registers: RegisterFile {
                read_register_1: annotated(
                    format!("Val({base})"),
                    format!("Read Register 1: Reads base address from source register {base}"),
                ),
                read_register_2: annotated(
                    format!("Val({rs2})"),
                    format!("Read Register 2: Reads the value to store from source register {rs2}"),
                ),
                write_register: annotated(
                    "Not used".to_owned(),
                    "Write Register: No register write (store instructions don't write to registers)"
                        .to_owned(),
                ),
            },
            alu: AluResult {
                alu_result: format!(
                    "The ALU performs the ADD operation for the store address.\nALU Result: \
                     Val({base}) + {offset} (address calculation)."
                ),
            },
            data_memory: DataMemory {
                read_data: NO_READ.to_owned(),
                write_data: format!(
                    "Data Memory: Stores Val({rs2}) at address [Val({base}) + {offset}]. Data \
                     Memory holds program data for load/store operations."
                ),
            },
        },
        format: InstrFormat::S,
    }
}
