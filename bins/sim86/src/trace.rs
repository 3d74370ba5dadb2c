use sim86_emulator::State;
use sim86_instruction::Instruction;
use std::fmt::Write;

/// One line of execution trace: the instruction followed by every slot it changed.
pub fn trace_line(instruction: &Instruction, before: &State, after: &State) -> String {
    let mut line = format!("{} ;", instruction);

    for (register, old, new) in before.changes(after) {
        let _ = write!(line, " {}:{:#x}->{:#x}", register.name(), old, new);
    }

    if before.flags() != after.flags() {
        let _ = write!(line, " flags:{}->{}", before.flags(), after.flags());
    }

    line
}
