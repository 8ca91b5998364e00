//! Static per-stage signal tables.
//!
//! These tables encode the control logic of a textbook five-stage RISC-V
//! pipeline as pure lookups: `(instruction class, stage) -> signal record`.
//! The lookup is total over the declared domain. Classes with no live paths
//! in a stage (a branch in WB, for example) map to an explicit all-inactive
//! record rather than failing, since a branch legitimately occupies WB while
//! asserting nothing.

use crate::isa::format::{InstrClass, InstrFormat};
use crate::pipeline::Stage;
use crate::pipeline::signals::{
    ExSignals, IdSignals, IfSignals, MemSignals, StageSignals, WbSignals,
};

/// IF record for sequential fetch.
pub const IF_SEQUENTIAL: IfSignals = IfSignals {
    branch_taken: false,
    mux_pc: true,
    pc_increment: true,
    pc_default: true,
    pc_id: false,
    pc_im: true,
    im_id: true,
};

/// IF record while fetching a branch or jump: the PC additionally feeds the
/// target-address path.
pub const IF_BRANCH: IfSignals = IfSignals {
    branch_taken: false,
    mux_pc: true,
    pc_increment: true,
    pc_default: true,
    pc_id: true,
    pc_im: true,
    im_id: true,
};

/// IF record in the cycle after a taken branch/jump resolves: the sequential
/// paths are dead and the target path steers the PC.
pub const IF_REDIRECT: IfSignals = IfSignals {
    branch_taken: true,
    mux_pc: true,
    pc_increment: false,
    pc_default: false,
    pc_id: false,
    pc_im: true,
    im_id: true,
};

const ID_R: IdSignals = IdSignals {
    id_reg1: true,
    id_reg2: true,
    id_reg_write: true,
    id_imm_gen: false,
    imm_ex: false,
    id_ex: false,
    reg1_ex: true,
    reg2_ex: true,
};

const ID_I: IdSignals = IdSignals {
    id_reg1: true,
    id_reg2: false,
    id_reg_write: true,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: false,
    reg1_ex: true,
    reg2_ex: false,
};

const ID_S: IdSignals = IdSignals {
    id_reg1: true,
    id_reg2: true,
    id_reg_write: false,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: false,
    reg1_ex: true,
    reg2_ex: true,
};

const ID_B: IdSignals = IdSignals {
    id_reg1: true,
    id_reg2: true,
    id_reg_write: false,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: true,
    reg1_ex: true,
    reg2_ex: true,
};

const ID_U: IdSignals = IdSignals {
    id_reg1: false,
    id_reg2: false,
    id_reg_write: true,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: false,
    reg1_ex: false,
    reg2_ex: false,
};

const ID_J: IdSignals = IdSignals {
    id_reg1: false,
    id_reg2: false,
    id_reg_write: true,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: true,
    reg1_ex: false,
    reg2_ex: false,
};

/// `jalr` reads a base register in addition to the jump paths.
const ID_JALR: IdSignals = IdSignals {
    id_reg1: true,
    id_reg2: false,
    id_reg_write: true,
    id_imm_gen: true,
    imm_ex: true,
    id_ex: true,
    reg1_ex: true,
    reg2_ex: false,
};

const EX_R: ExSignals = ExSignals {
    ex_add: false,
    add_mem: false,
    reg1_alu: true,
    reg2_mux: true,
    ex_shift: false,
    ex_mux: false,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: true,
};

const EX_I: ExSignals = ExSignals {
    ex_add: false,
    add_mem: false,
    reg1_alu: true,
    reg2_mux: false,
    ex_shift: false,
    ex_mux: true,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: true,
};

const EX_S: ExSignals = ExSignals {
    ex_add: false,
    add_mem: false,
    reg1_alu: true,
    reg2_mux: false,
    ex_shift: false,
    ex_mux: true,
    mux_alu: true,
    reg2_mem: true,
    zero_mem: false,
    alu_mem: true,
};

const EX_B: ExSignals = ExSignals {
    ex_add: true,
    add_mem: true,
    reg1_alu: true,
    reg2_mux: true,
    ex_shift: true,
    ex_mux: false,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: false,
};

const EX_U: ExSignals = ExSignals {
    ex_add: false,
    add_mem: false,
    reg1_alu: false,
    reg2_mux: false,
    ex_shift: false,
    ex_mux: true,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: true,
};

const EX_J: ExSignals = ExSignals {
    ex_add: true,
    add_mem: true,
    reg1_alu: true,
    reg2_mux: true,
    ex_shift: true,
    ex_mux: false,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: true,
};

const EX_JALR: ExSignals = ExSignals {
    ex_add: true,
    add_mem: true,
    reg1_alu: true,
    reg2_mux: false,
    ex_shift: false,
    ex_mux: true,
    mux_alu: true,
    reg2_mem: false,
    zero_mem: false,
    alu_mem: true,
};

/// ALU-producing classes pass the result straight through MEM.
const MEM_PASSTHROUGH: MemSignals = MemSignals {
    zero_mem2: false,
    alu_dm: false,
    reg2_dm: false,
    dm_wb: false,
    alu_wb: true,
};

/// Branches carry nothing live through MEM.
const MEM_INACTIVE: MemSignals = MemSignals {
    zero_mem2: false,
    alu_dm: false,
    reg2_dm: false,
    dm_wb: false,
    alu_wb: false,
};

const MEM_LOAD: MemSignals = MemSignals {
    zero_mem2: false,
    alu_dm: true,
    reg2_dm: false,
    dm_wb: true,
    alu_wb: false,
};

const MEM_STORE: MemSignals = MemSignals {
    zero_mem2: false,
    alu_dm: true,
    reg2_dm: true,
    dm_wb: false,
    alu_wb: false,
};

const WB_ALU: WbSignals = WbSignals {
    dm_mux: false,
    alu_mux: true,
    reg_write: true,
};

const WB_LOAD: WbSignals = WbSignals {
    dm_mux: true,
    alu_mux: false,
    reg_write: true,
};

/// Branches and stores write nothing back.
const WB_INACTIVE: WbSignals = WbSignals {
    dm_mux: false,
    alu_mux: false,
    reg_write: false,
};

/// IF-stage signals for an instruction class.
///
/// Branches and jumps additionally drive the PC into the target-address path
/// while being fetched; everything else fetches sequentially.
#[must_use]
pub const fn if_signals(class: InstrClass) -> IfSignals {
    if class.is_jump || class.is_branch() {
        IF_BRANCH
    } else {
        IF_SEQUENTIAL
    }
}

/// ID-stage signals for an instruction class.
#[must_use]
pub const fn id_signals(class: InstrClass) -> IdSignals {
    if class.is_jump {
        return match class.format {
            InstrFormat::I => ID_JALR,
            _ => ID_J,
        };
    }
    match class.format {
        InstrFormat::R => ID_R,
        InstrFormat::I => ID_I,
        InstrFormat::S => ID_S,
        InstrFormat::B => ID_B,
        InstrFormat::U => ID_U,
        InstrFormat::J => ID_J,
    }
}

/// EX-stage signals for an instruction class.
#[must_use]
pub const fn ex_signals(class: InstrClass) -> ExSignals {
    if class.is_jump {
        return match class.format {
            InstrFormat::I => EX_JALR,
            _ => EX_J,
        };
    }
    match class.format {
        InstrFormat::R => EX_R,
        InstrFormat::I => EX_I,
        InstrFormat::S => EX_S,
        InstrFormat::B => EX_B,
        InstrFormat::U => EX_U,
        InstrFormat::J => EX_J,
    }
}

/// MEM-stage signals for an instruction class.
#[must_use]
pub const fn mem_signals(class: InstrClass) -> MemSignals {
    if class.is_load {
        return MEM_LOAD;
    }
    match class.format {
        InstrFormat::S => MEM_STORE,
        InstrFormat::B => MEM_INACTIVE,
        InstrFormat::R | InstrFormat::I | InstrFormat::U | InstrFormat::J => MEM_PASSTHROUGH,
    }
}

/// WB-stage signals for an instruction class.
#[must_use]
pub const fn wb_signals(class: InstrClass) -> WbSignals {
    if class.is_load {
        return WB_LOAD;
    }
    match class.format {
        InstrFormat::S | InstrFormat::B => WB_INACTIVE,
        InstrFormat::R | InstrFormat::I | InstrFormat::U | InstrFormat::J => WB_ALU,
    }
}

/// Signal record for any `(class, stage)` pair.
///
/// Total over the domain; combinations with no live paths return the
/// stage's explicit inactive record.
#[must_use]
pub const fn signals_for(class: InstrClass, stage: Stage) -> StageSignals {
    match stage {
        Stage::If => StageSignals::If(if_signals(class)),
        Stage::Id => StageSignals::Id(id_signals(class)),
        Stage::Ex => StageSignals::Ex(ex_signals(class)),
        Stage::Mem => StageSignals::Mem(mem_signals(class)),
        Stage::Wb => StageSignals::Wb(wb_signals(class)),
    }
}
