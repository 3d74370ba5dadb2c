use sim86_decoder::{DecodeError, Decoder};
use sim86_instruction::Instruction;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A disassembly listing.  Decoding stops at the first error, which is kept next to the
/// instructions decoded before it.
pub struct Listing {
    pub instructions: Vec<(usize, Instruction)>,
    pub error: Option<DecodeError>,
}

impl Listing {
    pub fn decode(data: &[u8]) -> Self {
        let mut instructions = vec![];
        let mut error = None;

        for result in Decoder::new(data) {
            match result {
                Ok(decoded) => instructions.push(decoded),
                Err(err) => error = Some(err),
            }
        }

        Self {
            instructions,
            error,
        }
    }

    /// Jump targets that start an instruction, numbered in address order.
    pub fn labels(&self) -> BTreeMap<usize, String> {
        let starts: Vec<usize> = self.instructions.iter().map(|(at, _)| *at).collect();

        let mut targets: Vec<usize> = self
            .instructions
            .iter()
            .filter_map(|(at, instruction)| instruction.jump_target(*at))
            .filter(|target| starts.binary_search(target).is_ok())
            .collect();
        targets.sort_unstable();
        targets.dedup();

        targets
            .into_iter()
            .enumerate()
            .map(|(index, target)| (target, format!("label_{}", index)))
            .collect()
    }

    pub fn render(&self, with_labels: bool) -> String {
        let labels = if with_labels {
            self.labels()
        } else {
            BTreeMap::new()
        };

        let mut out = String::from("bits 16\n");
        for (at, instruction) in &self.instructions {
            if let Some(label) = labels.get(at) {
                let _ = writeln!(out, "{}:", label);
            }

            let label = instruction
                .jump_target(*at)
                .and_then(|target| labels.get(&target))
                .map(String::as_str);
            let _ = writeln!(out, "{}", instruction.with_label(label));
        }

        out
    }
}
