#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    // Data transfer
    MOV, // Move

    // Arithmetic
    ADD,  // Add
    ADC,  // Add with carry
    INC,  // Increment
    SUB,  // Subtract
    SBB,  // Subtract with borrow
    DEC,  // Decrement
    NEG,  // Change sign
    CMP,  // Compare
    MUL,  // Multiply (unsigned)
    IMUL, // Integer multiply (signed)

    // Logic
    NOT,  // Invert
    SHL,  // Shift logical left (alias: SAL)
    SHR,  // Shift logical right
    SAR,  // Shift arithmetic right
    AND,  // And
    TEST, // And function to flags, no result
    OR,   // Or
    XOR,  // Exclusive or

    // Control transfer
    JMP,    // Unconditional jump
    JZ,     // Jump on equal/zero (alias JE)
    JL,     // Jump on less/not greater or equal (alias JNGE)
    JLE,    // Jump on less or equal/not greater (alias JNG)
    JB,     // Jump on below/not above or equal (alias JNAE)
    JBE,    // Jump on below or equal/not above (alias JNA)
    JP,     // Jump on parity/parity even (alias JPE)
    JO,     // Jump on overflow
    JS,     // Jump on sign
    JNZ,    // Jump on not equal/not zero (alias JNE)
    JGE,    // Jump on not less/greater or equal (alias JNL)
    JG,     // Jump on not less or equal/greater (alias JNLE)
    JAE,    // Jump on not below/above or equal (alias JNB)
    JA,     // Jump on not below or equal/above (alias JNBE)
    JNP,    // Jump on not parity/parity odd (alias JPO)
    JNO,    // Jump on not overflow
    JNS,    // Jump on not sign
    LOOP,   // Loop CX times
    LOOPZ,  // Loop while zero/equal (alias LOOPE)
    LOOPNZ, // Loop while not zero/equal (alias LOOPNE)
    JCXZ,   // Jump on CX zero

    // Processor control
    HLT, // Halt
}

impl Operation {
    /// Operations whose single operand is a relative jump displacement.
    pub fn is_jump(self) -> bool {
        use Operation::*;

        matches!(
            self,
            JMP | JZ
                | JL
                | JLE
                | JB
                | JBE
                | JP
                | JO
                | JS
                | JNZ
                | JGE
                | JG
                | JAE
                | JA
                | JNP
                | JNO
                | JNS
                | LOOP
                | LOOPZ
                | LOOPNZ
                | JCXZ
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, Operation::SHL | Operation::SHR | Operation::SAR)
    }

    /// Whether the result of the operation is stored into the destination operand.
    pub fn writes_back(self) -> bool {
        use Operation::*;

        matches!(
            self,
            MOV | ADD | ADC | INC | SUB | SBB | DEC | NEG | NOT | SHL | SHR | SAR | AND | OR | XOR
        )
    }

    pub fn mnemonic(self) -> &'static str {
        use Operation::*;

        match self {
            MOV => "mov",
            ADD => "add",
            ADC => "adc",
            INC => "inc",
            SUB => "sub",
            SBB => "sbb",
            DEC => "dec",
            NEG => "neg",
            CMP => "cmp",
            MUL => "mul",
            IMUL => "imul",
            NOT => "not",
            SHL => "shl",
            SHR => "shr",
            SAR => "sar",
            AND => "and",
            TEST => "test",
            OR => "or",
            XOR => "xor",
            JMP => "jmp",
            JZ => "jz",
            JL => "jl",
            JLE => "jle",
            JB => "jb",
            JBE => "jbe",
            JP => "jp",
            JO => "jo",
            JS => "js",
            JNZ => "jnz",
            JGE => "jge",
            JG => "jg",
            JAE => "jae",
            JA => "ja",
            JNP => "jnp",
            JNO => "jno",
            JNS => "jns",
            LOOP => "loop",
            LOOPZ => "loopz",
            LOOPNZ => "loopnz",
            JCXZ => "jcxz",
            HLT => "hlt",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
